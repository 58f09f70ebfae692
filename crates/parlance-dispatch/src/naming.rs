//! Command name derivation and alias collision handling.
//!
//! An identifier such as `VersionBumpCommand` (or `version_bump_command`) is
//! split into segments, a leading `command` segment is dropped, and the rest
//! is joined in kebab case:
//!
//! ```text
//! VersionBumpCommand   → version-bump-command   short: vbc
//! CommandExit          → exit                   short: e
//! HTMLExport           → html-export            short: he
//! ```

use std::collections::HashMap;

/// Splits an identifier into words.
///
/// Uppercase-led words follow the usual camel-case rules: an acronym run ends
/// one letter before the next capitalised word (`HTMLParser` → `HTML`,
/// `Parser`), and digits attach to the word before them. Lowercase-led runs
/// are words of their own, and `_`, `-` and any other non-alphanumeric
/// character separate words.
pub fn split_identifier(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let n = chars.len();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < n {
        let c = chars[i];

        if c.is_ascii_uppercase() {
            let mut run_end = i;
            while run_end < n && chars[run_end].is_ascii_uppercase() {
                run_end += 1;
            }
            // longest acronym prefix that is followed by a new word
            let acronym_end = (i + 1..=run_end).rev().find(|&k| {
                k + 1 < n && is_upper_or_digit(chars[k]) && is_lower_or_digit(chars[k + 1])
            });
            if let Some(k) = acronym_end {
                segments.push(chars[i..k].iter().collect());
                i = k;
                continue;
            }
        }

        if c.is_ascii_alphanumeric() {
            let mut j = i + 1;
            while j < n && is_lower_or_digit(chars[j]) {
                j += 1;
            }
            segments.push(chars[i..j].iter().collect());
            i = j;
            continue;
        }

        i += 1;
    }

    segments
}

fn is_upper_or_digit(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

fn is_lower_or_digit(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Derives the kebab-case base name for an identifier, or `None` if nothing
/// is left after dropping a leading `command` word.
///
/// ```
/// use parlance_dispatch::derive_base_name;
///
/// assert_eq!(derive_base_name("CommandExit").as_deref(), Some("exit"));
/// assert_eq!(derive_base_name("VersionBumpCommand").as_deref(), Some("version-bump-command"));
/// assert_eq!(derive_base_name("Command"), None);
/// ```
pub fn derive_base_name(identifier: &str) -> Option<String> {
    let mut segments = split_identifier(identifier);
    if segments
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case("command"))
    {
        segments.remove(0);
    }

    let name = segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join("-");

    (!name.is_empty()).then_some(name)
}

/// First character of every `-`-separated section: `version-bump-command` → `vbc`.
pub fn short_name(base: &str) -> String {
    base.split('-').filter_map(|s| s.chars().next()).collect()
}

/// Hands out unique alias strings across one lookup build.
///
/// The first claim of a name returns it unchanged; the Nth later claim
/// returns the name followed by N.
#[derive(Debug, Default)]
pub struct AliasCounter {
    counts: HashMap<String, usize>,
}

impl AliasCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        match self.counts.get_mut(name) {
            Some(count) => {
                let alias = format!("{}{}", name, count);
                *count += 1;
                alias
            }
            None => {
                self.counts.insert(name.to_string(), 1);
                name.to_string()
            }
        }
    }
}
