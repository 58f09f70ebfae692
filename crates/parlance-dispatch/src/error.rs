//! Error types for binding and dispatch.

use parlance_input::{CoercionError, InputError};
use thiserror::Error;

/// Failure to build a parameter object from parsed input.
#[derive(Debug, Error)]
pub enum BindError {
    /// A required field was not supplied under either of its keys.
    #[error("Required parameter '{long}' was not provided{}.", short_hint(.short))]
    MissingRequired {
        field: String,
        long: String,
        short: Option<String>,
    },

    /// A declared default, or the type's empty value, does not fit the field.
    #[error("Parameter '{field}' has no usable value: {source}")]
    InvalidValue {
        field: String,
        #[source]
        source: CoercionError,
    },

    /// A value supplied on the command line could not be converted.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The handler received a parameter object of another type.
    #[error("handler expected parameters of type {expected}")]
    TypeMismatch { expected: &'static str },
}

fn short_hint(short: &Option<String>) -> String {
    short
        .as_deref()
        .map(|s| format!(" (short '{}')", s))
        .unwrap_or_default()
}

/// Errors that abort a single command line.
///
/// None of these leave the lookup or the registry in a state that affects
/// the next command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Empty or whitespace-only input where a command name was expected.
    #[error("No command was given.")]
    MalformedInput,

    /// The command name is not a known alias.
    #[error("Command '{name}' not found.")]
    CommandNotFound { name: String },

    /// The command's parameter type has no binder in the cache.
    #[error("No parameter binder is registered for {type_name}.")]
    ParameterTypeUnregistered { type_name: &'static str },

    /// The command's parameters could not be bound.
    #[error("Invalid arguments for '{command}': {source}")]
    BindingFailed {
        command: String,
        #[source]
        source: BindError,
    },

    /// A supplied value could not be converted to the requested type.
    #[error(transparent)]
    CoercionFailed(InputError),

    /// The handler itself failed.
    #[error(transparent)]
    InvocationFailed(anyhow::Error),
}

impl DispatchError {
    /// Attaches the command name to a binding failure. Conversion failures of
    /// supplied values are reported as [`DispatchError::CoercionFailed`].
    pub fn binding(command: impl Into<String>, source: BindError) -> Self {
        match source {
            BindError::Input(inner) => Self::CoercionFailed(inner),
            source => Self::BindingFailed {
                command: command.into(),
                source,
            },
        }
    }
}

/// An alias that could not be inserted into the lookup, even after suffixing.
///
/// Collected during the lookup build and logged; never returned as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Alias '{alias}' for command '{command}' is already taken.")]
pub struct DuplicateCommandName {
    pub alias: String,
    pub command: String,
}
