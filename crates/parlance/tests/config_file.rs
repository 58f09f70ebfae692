use std::io::Write;

use parlance::{ConfigError, FailurePolicy, HeadlessMode, Parser, ParserConfig};
use tempfile::NamedTempFile;

#[test]
fn loads_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
generate_short_names = false
cli_cursor = ">> "
enable_exit = false
headless_mode = "ignore-input-arguments"
headless_command = "help --expand"
failure_policy = "abort"
"#
    )
    .unwrap();

    let config = ParserConfig::from_file(file.path()).unwrap();

    assert!(!config.generate_short_names);
    assert_eq!(config.cli_cursor, ">> ");
    assert!(config.enable_help);
    assert!(!config.enable_exit);
    assert_eq!(config.headless_mode, HeadlessMode::IgnoreInputArguments);
    assert_eq!(config.headless_command, "help --expand");
    assert_eq!(config.failure_policy, FailurePolicy::Abort);

    let parser = Parser::builder().config(config).build();
    assert!(parser.lookup().contains("help"));
    assert!(!parser.lookup().contains("h"));
    assert!(!parser.lookup().contains("exit"));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "cli_cursor = ").unwrap();

    let err = ParserConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn round_trips_through_toml() {
    let config = ParserConfig::default().with_headless_mode(HeadlessMode::AllowInputArguments);
    let text = toml::to_string(&config).unwrap();
    assert_eq!(ParserConfig::from_toml_str(&text).unwrap(), config);
}
