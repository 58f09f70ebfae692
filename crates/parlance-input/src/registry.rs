//! The reusable key/value store populated by tokenization.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::tokenizer::{tokenize, IngestionCursor};
use crate::{flatten_args, FromInputValue, InputError, InputValue};

/// Parsed parameters for the current ingestion cycle.
///
/// A registry accumulates across [`ingest_str`](Self::ingest_str) calls until
/// it is cleared. Clearing wipes the map and resets the positional and
/// quoted-string counters together.
///
/// # Example
///
/// ```
/// use parlance_input::InputRegistry;
///
/// let mut registry = InputRegistry::new();
/// registry.ingest_str(r#"--root=/tmp -v "hello world" extra"#);
///
/// assert_eq!(registry.get::<String>("--root").unwrap(), "/tmp");
/// assert!(registry.get::<bool>("-v").unwrap());
/// assert_eq!(registry.get::<String>("quotedString_0").unwrap(), "hello world");
/// assert_eq!(registry.get::<String>("positional_0").unwrap(), "extra");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputRegistry {
    values: HashMap<String, InputValue>,
    cursor: IngestionCursor,
}

impl InputRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenizes one flattened command line into the registry.
    ///
    /// A later value for the same key replaces the earlier one.
    pub fn ingest_str(&mut self, input: &str) {
        let entries = tokenize(input, &mut self.cursor);
        debug!(entries = entries.len(), "ingested command line");
        for entry in entries {
            let (key, value) = entry.into_pair();
            self.values.insert(key, value);
        }
    }

    /// Flattens an argv-style token list and ingests the result.
    pub fn ingest_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let line = flatten_args(args);
        self.ingest_str(&line);
    }

    /// Removes every value and resets both counters.
    pub fn clear(&mut self) {
        self.values.clear();
        self.cursor.reset();
    }

    /// Borrows the registry for one ingestion cycle; it is cleared when the
    /// guard is dropped.
    pub fn scoped(&mut self) -> RegistryGuard<'_> {
        RegistryGuard { registry: self }
    }

    /// The counters for the current cycle.
    pub fn cursor(&self) -> IngestionCursor {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterates stored keys and values in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The raw stored value for `key`.
    pub fn raw(&self, key: &str) -> Option<&InputValue> {
        self.values.get(key)
    }

    /// The raw value stored under `primary`, else under `short`.
    pub fn lookup_by_names(&self, primary: &str, short: &str) -> Option<(&str, &InputValue)> {
        self.values
            .get_key_value(primary)
            .or_else(|| self.values.get_key_value(short))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Reads and converts a required value.
    pub fn get<T: FromInputValue>(&self, key: &str) -> Result<T, InputError> {
        self.get_optional(key)?
            .ok_or_else(|| InputError::not_found(key))
    }

    /// Reads and converts a value, returning `Ok(None)` if it is absent.
    ///
    /// A value that is present but cannot be converted is still an error.
    pub fn get_optional<T: FromInputValue>(&self, key: &str) -> Result<Option<T>, InputError> {
        self.values
            .get(key)
            .map(|value| convert(key, value))
            .transpose()
    }

    /// Reads `primary`, falling back to `short`.
    pub fn get_by_names<T: FromInputValue>(
        &self,
        primary: &str,
        short: &str,
    ) -> Result<T, InputError> {
        self.get_optional_by_names(primary, short)?
            .ok_or_else(|| InputError::NotFoundAny {
                primary: primary.to_string(),
                short: short.to_string(),
            })
    }

    /// Reads `primary`, falling back to `short`, returning `Ok(None)` when
    /// neither is present.
    pub fn get_optional_by_names<T: FromInputValue>(
        &self,
        primary: &str,
        short: &str,
    ) -> Result<Option<T>, InputError> {
        self.lookup_by_names(primary, short)
            .map(|(key, value)| convert(key, value))
            .transpose()
    }
}

fn convert<T: FromInputValue>(key: &str, value: &InputValue) -> Result<T, InputError> {
    T::from_input(value).map_err(|source| InputError::coercion(key, source))
}

/// Exclusive access to an [`InputRegistry`] that clears it on drop.
#[derive(Debug)]
pub struct RegistryGuard<'a> {
    registry: &'a mut InputRegistry,
}

impl Deref for RegistryGuard<'_> {
    type Target = InputRegistry;

    fn deref(&self) -> &Self::Target {
        self.registry
    }
}

impl DerefMut for RegistryGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registry
    }
}

impl Drop for RegistryGuard<'_> {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
