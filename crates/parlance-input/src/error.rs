//! Error types for input ingestion and lookup.

/// A stored value could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found '{found}'")]
pub struct CoercionError {
    /// Name of the requested target type.
    pub expected: &'static str,
    /// Textual form of the value that was stored.
    pub found: String,
}

impl CoercionError {
    /// Create a coercion error for the given target type and offending value.
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

/// Errors that can occur when reading parameters back out of an
/// [`InputRegistry`](crate::InputRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No value was stored under the key.
    #[error("Parameter '{key}' not found.")]
    NotFound { key: String },

    /// Neither the primary nor the short key had a value.
    #[error("Parameter '{primary}' or '{short}' not found.")]
    NotFoundAny { primary: String, short: String },

    /// A value exists under the key but cannot be converted.
    #[error("Parameter '{key}' could not be read: {source}")]
    Coercion {
        key: String,
        #[source]
        source: CoercionError,
    },
}

impl InputError {
    /// Create a not-found error for a single key.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a coercion error for a key.
    pub fn coercion(key: impl Into<String>, source: CoercionError) -> Self {
        Self::Coercion {
            key: key.into(),
            source,
        }
    }

    /// Returns true for both not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundAny { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_both_keys() {
        let err = InputError::NotFoundAny {
            primary: "--root".into(),
            short: "-r".into(),
        };
        assert_eq!(err.to_string(), "Parameter '--root' or '-r' not found.");
        assert!(err.is_not_found());
    }

    #[test]
    fn coercion_is_not_a_not_found() {
        let err = InputError::coercion("--count", CoercionError::new("i32", "many"));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("expected i32, found 'many'"));
    }
}
