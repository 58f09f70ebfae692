//! Integration tests for parlance-input.
//!
//! These exercise the registry the way the dispatcher drives it: ingest a
//! command tail, read values back by long and short name, clear, repeat.

use parlance_input::{flatten_args, InputError, InputRegistry, InputValue};

fn ingested(line: &str) -> InputRegistry {
    let mut registry = InputRegistry::new();
    registry.ingest_str(line);
    registry
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn parses_multiple_key_value_pairs() {
    let registry = ingested("--key1=value1 --key2=value2");
    assert_eq!(registry.get::<String>("--key1").unwrap(), "value1");
    assert_eq!(registry.get::<String>("--key2").unwrap(), "value2");
}

#[test]
fn parses_short_and_long_flags() {
    let registry = ingested("--flag -f");
    assert!(registry.get::<bool>("--flag").unwrap());
    assert!(registry.get::<bool>("-f").unwrap());
}

#[test]
fn parses_mixed_arguments() {
    let registry = ingested(
        r#"--key1=value1 --key2=value2 -f --quoted="This is a test" arg1 arg2 --boolFlag=true --negativeFlag=false"#,
    );

    assert_eq!(registry.get::<String>("--key1").unwrap(), "value1");
    assert_eq!(registry.get::<String>("--key2").unwrap(), "value2");
    assert!(registry.get::<bool>("-f").unwrap());
    assert_eq!(registry.get::<String>("--quoted").unwrap(), "This is a test");
    assert_eq!(registry.get::<String>("positional_0").unwrap(), "arg1");
    assert_eq!(registry.get::<String>("positional_1").unwrap(), "arg2");
    assert!(registry.get::<bool>("--boolFlag").unwrap());
    assert!(!registry.get::<bool>("--negativeFlag").unwrap());
}

#[test]
fn spaces_around_equals_are_tolerated() {
    let registry = ingested("--name = value");
    assert_eq!(registry.get::<String>("--name").unwrap(), "value");
}

#[test]
fn separate_ingestions_accumulate() {
    let mut registry = InputRegistry::new();
    registry.ingest_str("one");
    registry.ingest_str("two --k=v");

    assert_eq!(registry.get::<String>("positional_0").unwrap(), "one");
    assert_eq!(registry.get::<String>("positional_1").unwrap(), "two");
    assert_eq!(registry.get::<String>("--k").unwrap(), "v");
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn missing_parameter_is_not_found() {
    let registry = InputRegistry::new();
    let err = registry.get::<String>("nonexistent").unwrap_err();
    assert_eq!(err, InputError::not_found("nonexistent"));
    assert_eq!(err.to_string(), "Parameter 'nonexistent' not found.");
}

#[test]
fn optional_parameter_absent_and_present() {
    let registry = ingested("--key=value");
    assert_eq!(registry.get_optional::<String>("--missing").unwrap(), None);
    assert_eq!(
        registry.get_optional::<String>("--key").unwrap(),
        Some("value".to_string())
    );
}

#[test]
fn possible_names_full_then_short() {
    let full = ingested("--fullName=value");
    assert_eq!(full.get_by_names::<String>("--fullName", "-f").unwrap(), "value");

    let short = ingested("-f=value");
    assert_eq!(short.get_by_names::<String>("--fullName", "-f").unwrap(), "value");
    assert_eq!(
        short.get_optional_by_names::<String>("--fullName", "-f").unwrap(),
        Some("value".to_string())
    );
}

#[test]
fn possible_names_both_missing() {
    let registry = InputRegistry::new();
    let err = registry
        .get_by_names::<String>("--nonexistent", "-n")
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        registry
            .get_optional_by_names::<String>("--nonexistent", "-n")
            .unwrap(),
        None
    );
}

#[test]
fn possible_names_boolean_flag() {
    let registry = ingested("--flag");
    assert!(registry.get_by_names::<bool>("--flag", "-f").unwrap());
    assert_eq!(
        registry.get_optional_by_names::<bool>("--flag", "-f").unwrap(),
        Some(true)
    );
}

#[test]
fn typed_lookup_converts_numbers_and_lists() {
    let registry = ingested("--port=8080 --tags=a,b,c --ratio=0.5");
    assert_eq!(registry.get::<u16>("--port").unwrap(), 8080);
    assert_eq!(
        registry.get::<Vec<String>>("--tags").unwrap(),
        vec!["a", "b", "c"]
    );
    assert_eq!(registry.get::<f64>("--ratio").unwrap(), 0.5);
}

#[test]
fn flag_cannot_be_read_as_number() {
    let registry = ingested("--port");
    let err = registry.get::<u16>("--port").unwrap_err();
    assert!(!err.is_not_found());
}

// ============================================================================
// Reuse
// ============================================================================

#[test]
fn clear_removes_parameters() {
    let mut registry = ingested("--key=value");
    registry.clear();
    assert!(registry.get::<String>("--key").unwrap_err().is_not_found());
}

#[test]
fn scoped_cycles_do_not_leak() {
    let mut registry = InputRegistry::new();

    {
        let mut cycle = registry.scoped();
        cycle.ingest_str("--only-first=1 first");
        assert_eq!(cycle.get::<u8>("--only-first").unwrap(), 1);
    }

    {
        let mut cycle = registry.scoped();
        cycle.ingest_str("second");
        assert!(!cycle.contains_key("--only-first"));
        assert_eq!(cycle.get::<String>("positional_0").unwrap(), "second");
    }

    assert!(registry.is_empty());
}

// ============================================================================
// Argument arrays
// ============================================================================

#[test]
fn ingest_args_preserves_spaces_in_values() {
    let mut registry = InputRegistry::new();
    registry.ingest_args(&["--root=/my projects", "hello world", "-v", "--push=true"]);

    assert_eq!(registry.get::<String>("--root").unwrap(), "/my projects");
    assert_eq!(registry.get::<String>("quotedString_0").unwrap(), "hello world");
    assert!(registry.get::<bool>("-v").unwrap());
    // quoted by flattening, so stored as text and converted on lookup
    assert_eq!(
        registry.raw("--push"),
        Some(&InputValue::Text("true".to_string()))
    );
    assert!(registry.get::<bool>("--push").unwrap());
}

#[test]
fn flatten_leaves_plain_tokens_alone() {
    assert_eq!(flatten_args(&["a", "-b", "--c"]), "a -b --c");
}
