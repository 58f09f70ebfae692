//! Joining argv-style tokens into one line the tokenizer can read unambiguously.

/// Rejoins process arguments with single spaces, quoting where the shell
/// already removed the quotes.
///
/// - `key="value"` tokens are left as they are.
/// - `key=value` becomes `key="value"`.
/// - A token containing a space that does not start with `-` is wrapped in quotes.
/// - Everything else is unchanged.
///
/// ```
/// use parlance_input::flatten_args;
///
/// let line = flatten_args(&["bump", "--root=/my dir", "two words", "-v"]);
/// assert_eq!(line, r#"bump --root="/my dir" "two words" -v"#);
/// ```
pub fn flatten_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| flatten_one(arg.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn flatten_one(arg: &str) -> String {
    if arg.contains("=\"") && arg.ends_with('"') {
        return arg.to_string();
    }

    if let Some((key, value)) = arg.split_once('=') {
        return format!("{}=\"{}\"", key, value);
    }

    if arg.contains(' ') && !arg.starts_with('-') {
        return format!("\"{}\"", arg);
    }

    arg.to_string()
}
