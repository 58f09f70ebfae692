//! The fixed command-line grammar.
//!
//! One left-to-right scan, first matching rule wins:
//!
//! ```text
//! 1. --name=value | -n=value        value is "quoted" or a run of non-spaces
//! 2. --name | -n                    followed by whitespace or end → flag (true)
//! 3. "quoted string"                → quotedString_<n>
//! 4. any other non-space run        → positional_<n>
//! ```
//!
//! Names start with a word character and may contain word characters and `-`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::InputValue;

/// Key prefix for bare positional tokens.
pub const POSITIONAL_PREFIX: &str = "positional_";

/// Key prefix for standalone quoted strings.
pub const QUOTED_PREFIX: &str = "quotedString_";

/// Alternatives in priority order: `key=value`, flag, quoted string,
/// positional.
///
/// An unquoted value runs to the next literal space, not the next whitespace
/// character: in `--a=x\t--b=y` the value of `--a` is `x\t--b=y`.
/// Lines built by [`flatten_args`](crate::flatten_args) quote every
/// `key=value` token, so argv input is unaffected.
static GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?P<key>--\w[\w-]*|-\w[\w-]*)\s*=\s*(?P<value>"[^"]*"|[^ ]+)"#,
        r#"|(?P<flag>--\w[\w-]*|-\w[\w-]*)(?:\s|$)"#,
        r#"|"(?P<quoted>[^"]*)""#,
        r#"|(?P<positional>\S+)"#,
    ))
    .expect("tokenizer grammar is a valid pattern")
});

/// Synthesized key for the `n`th positional token.
pub fn positional_key(n: u32) -> String {
    format!("{}{}", POSITIONAL_PREFIX, n)
}

/// Synthesized key for the `n`th standalone quoted string.
pub fn quoted_key(n: u32) -> String {
    format!("{}{}", QUOTED_PREFIX, n)
}

/// One raw value produced by tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterEntry {
    /// `--key=value`; booleans literals are already coerced.
    KeyValue { key: String, value: InputValue },
    /// `--flag` with nothing attached.
    Flag { key: String },
    /// A standalone `"quoted string"`.
    QuotedPositional { index: u32, value: String },
    /// Any other token.
    BarePositional { index: u32, value: String },
}

impl ParameterEntry {
    /// The registry key this entry is stored under.
    pub fn key(&self) -> String {
        match self {
            ParameterEntry::KeyValue { key, .. } | ParameterEntry::Flag { key } => key.clone(),
            ParameterEntry::QuotedPositional { index, .. } => quoted_key(*index),
            ParameterEntry::BarePositional { index, .. } => positional_key(*index),
        }
    }

    /// Split into the registry key and the stored value.
    pub fn into_pair(self) -> (String, InputValue) {
        let key = self.key();
        let value = match self {
            ParameterEntry::KeyValue { value, .. } => value,
            ParameterEntry::Flag { .. } => InputValue::Bool(true),
            ParameterEntry::QuotedPositional { value, .. }
            | ParameterEntry::BarePositional { value, .. } => InputValue::Text(value),
        };
        (key, value)
    }
}

/// Counters for synthesized positional and quoted-string keys.
///
/// Both counters only ever reset together through [`IngestionCursor::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionCursor {
    positional: u32,
    quoted: u32,
}

impl IngestionCursor {
    /// Creates a cursor with both counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positional tokens seen since the last reset.
    pub fn positional(&self) -> u32 {
        self.positional
    }

    /// Number of quoted strings seen since the last reset.
    pub fn quoted(&self) -> u32 {
        self.quoted
    }

    /// Zeroes both counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn next_positional(&mut self) -> u32 {
        let n = self.positional;
        self.positional += 1;
        n
    }

    fn next_quoted(&mut self) -> u32 {
        let n = self.quoted;
        self.quoted += 1;
        n
    }
}

/// Tokenizes one flattened command line, advancing `cursor` for every
/// positional or quoted string encountered.
pub fn tokenize(input: &str, cursor: &mut IngestionCursor) -> Vec<ParameterEntry> {
    GRAMMAR
        .captures_iter(input)
        .filter_map(|caps| classify(&caps, cursor))
        .collect()
}

fn classify(caps: &Captures<'_>, cursor: &mut IngestionCursor) -> Option<ParameterEntry> {
    if let (Some(key), Some(value)) = (caps.name("key"), caps.name("value")) {
        let raw = value.as_str();
        let value = match InputValue::parse_bool_literal(raw) {
            Some(b) => InputValue::Bool(b),
            None => InputValue::Text(raw.trim_matches('"').to_string()),
        };
        return Some(ParameterEntry::KeyValue {
            key: key.as_str().to_string(),
            value,
        });
    }

    if let Some(flag) = caps.name("flag") {
        return Some(ParameterEntry::Flag {
            key: flag.as_str().to_string(),
        });
    }

    if let Some(quoted) = caps.name("quoted") {
        return Some(ParameterEntry::QuotedPositional {
            index: cursor.next_quoted(),
            value: quoted.as_str().to_string(),
        });
    }

    caps.name("positional")
        .map(|positional| ParameterEntry::BarePositional {
            index: cursor.next_positional(),
            value: positional.as_str().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(input: &str) -> Vec<ParameterEntry> {
        tokenize(input, &mut IngestionCursor::new())
    }

    #[test]
    fn key_value_with_plain_value() {
        assert_eq!(
            entries("--key=value"),
            vec![ParameterEntry::KeyValue {
                key: "--key".into(),
                value: InputValue::from("value"),
            }]
        );
    }

    #[test]
    fn unquoted_value_ends_at_a_space_only() {
        assert_eq!(
            entries("--a=x\t--b=y --c=z"),
            vec![
                ParameterEntry::KeyValue {
                    key: "--a".into(),
                    value: InputValue::from("x\t--b=y"),
                },
                ParameterEntry::KeyValue {
                    key: "--c".into(),
                    value: InputValue::from("z"),
                },
            ]
        );
    }

    #[test]
    fn key_value_strips_quotes() {
        assert_eq!(
            entries(r#"-q="a b c""#),
            vec![ParameterEntry::KeyValue {
                key: "-q".into(),
                value: InputValue::from("a b c"),
            }]
        );
    }

    #[test]
    fn key_value_boolean_literal() {
        assert_eq!(
            entries("--push=FALSE"),
            vec![ParameterEntry::KeyValue {
                key: "--push".into(),
                value: InputValue::Bool(false),
            }]
        );
    }

    #[test]
    fn quoted_boolean_stays_text() {
        assert_eq!(
            entries(r#"--push="true""#),
            vec![ParameterEntry::KeyValue {
                key: "--push".into(),
                value: InputValue::from("true"),
            }]
        );
    }

    #[test]
    fn hyphenated_keys() {
        let parsed = entries("--source-folder=src -pr=A");
        assert_eq!(parsed[0].key(), "--source-folder");
        assert_eq!(parsed[1].key(), "-pr");
    }

    #[test]
    fn flags_before_whitespace_and_end() {
        assert_eq!(
            entries("--verbose -f"),
            vec![
                ParameterEntry::Flag {
                    key: "--verbose".into()
                },
                ParameterEntry::Flag { key: "-f".into() },
            ]
        );
    }

    #[test]
    fn dangling_equals_is_positional() {
        assert_eq!(
            entries("--key="),
            vec![ParameterEntry::BarePositional {
                index: 0,
                value: "--key=".into(),
            }]
        );
    }

    #[test]
    fn quoted_and_positional_counters_are_independent() {
        let parsed = entries(r#"one "two words" three "four""#);
        let keys: Vec<String> = parsed.iter().map(ParameterEntry::key).collect();
        assert_eq!(
            keys,
            vec!["positional_0", "quotedString_0", "positional_1", "quotedString_1"]
        );
    }

    #[test]
    fn cursor_carries_across_calls() {
        let mut cursor = IngestionCursor::new();
        tokenize("a b", &mut cursor);
        let second = tokenize("c", &mut cursor);
        assert_eq!(second[0].key(), "positional_2");
        assert_eq!(cursor.positional(), 3);

        cursor.reset();
        assert_eq!(cursor, IngestionCursor::new());
    }

    #[test]
    fn into_pair_for_flag_is_true() {
        let (key, value) = ParameterEntry::Flag { key: "-x".into() }.into_pair();
        assert_eq!(key, "-x");
        assert_eq!(value, InputValue::Bool(true));
    }
}
