//! Parameter declarations.
//!
//! A parameter object is a plain struct that implements [`Parameters`]: it
//! describes its fields once through a [`ParameterSchema`] and builds itself
//! from the resolved [`BoundValues`].
//!
//! # Example
//!
//! ```
//! use parlance_dispatch::{BindError, BoundValues, FieldSpec, ParameterSchema, Parameters};
//!
//! struct BumpArgs {
//!     root: String,
//!     projects: String,
//!     push: bool,
//! }
//!
//! impl Parameters for BumpArgs {
//!     fn schema() -> ParameterSchema {
//!         ParameterSchema::new()
//!             .field(FieldSpec::value("root").required().description("Repository root"))
//!             .field(FieldSpec::value("projects").required())
//!             .field(FieldSpec::flag("push").default_value(false))
//!     }
//!
//!     fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
//!         Ok(Self {
//!             root: values.get("root")?,
//!             projects: values.get("projects")?,
//!             push: values.get("push")?,
//!         })
//!     }
//! }
//! ```

use std::collections::HashMap;

use parlance_input::{CoercionError, FromInputValue, InputError, InputValue};
use tracing::warn;

use crate::BindError;

/// Whether a field is a switch or carries a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `--name` alone means true; any text that is not a boolean literal
    /// also means true.
    Flag,
    /// `--name=value`.
    Value,
}

/// Declaration of one bindable field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    short_name: Option<String>,
    kind: FieldKind,
    description: Option<String>,
    required: bool,
    default: Option<InputValue>,
}

impl FieldSpec {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        let short_name = name.chars().next().map(String::from);
        Self {
            name,
            short_name,
            kind,
            description: None,
            required: false,
            default: None,
        }
    }

    /// A `--name=value` field. The short name defaults to the first
    /// character of `name`.
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Value)
    }

    /// A `--name` switch. The short name defaults to the first character of
    /// `name`.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Flag)
    }

    pub fn short(mut self, short: impl Into<String>) -> Self {
        self.short_name = Some(short.into());
        self
    }

    /// Removes the short name; the field is only reachable as `--name`.
    pub fn no_short(mut self) -> Self {
        self.short_name = None;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value used when the field is absent from the input.
    pub fn default_value(mut self, value: impl Into<InputValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn help(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn declared_default(&self) -> Option<&InputValue> {
        self.default.as_ref()
    }

    /// `--name`
    pub fn long_key(&self) -> String {
        format!("--{}", self.name)
    }

    /// `-s`, if the field has a short name.
    pub fn short_key(&self) -> Option<String> {
        self.short_name.as_ref().map(|s| format!("-{}", s))
    }

    /// Applies flag semantics to a supplied value.
    pub(crate) fn normalize(&self, value: &InputValue) -> InputValue {
        match (self.kind, value) {
            (FieldKind::Flag, InputValue::Text(text)) => {
                InputValue::Bool(InputValue::parse_bool_literal(text).unwrap_or(true))
            }
            _ => value.clone(),
        }
    }
}

/// The ordered field declarations of one parameter type.
///
/// Field names and short names are unique within a schema. A later field
/// that repeats a name is dropped; one that repeats a short name loses its
/// short name. Both cases are logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    fields: Vec<FieldSpec>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field declaration.
    pub fn field(mut self, mut field: FieldSpec) -> Self {
        if self.get(field.name()).is_some() {
            warn!(field = field.name(), "duplicate parameter name, keeping the first");
            return self;
        }

        if let Some(short) = field.short_name() {
            if let Some(owner) = self.by_short(short) {
                warn!(
                    field = field.name(),
                    short,
                    owner = owner.name(),
                    "duplicate parameter short name, keeping the first"
                );
                field.short_name = None;
            }
        }

        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn by_short(&self, short: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.short_name.as_deref() == Some(short))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BoundValue {
    value: InputValue,
    /// The input key the value was read from; `None` for declared defaults.
    key: Option<String>,
}

/// Field values resolved for one command line, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundValues {
    values: HashMap<String, BoundValue>,
}

impl BoundValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value read from the input under `key`.
    pub fn supply(&mut self, field: impl Into<String>, key: impl Into<String>, value: InputValue) {
        self.values.insert(
            field.into(),
            BoundValue {
                value,
                key: Some(key.into()),
            },
        );
    }

    /// Records a declared default.
    pub fn default_to(&mut self, field: impl Into<String>, value: InputValue) {
        self.values
            .insert(field.into(), BoundValue { value, key: None });
    }

    /// True if the field was given on the command line.
    pub fn is_supplied(&self, field: &str) -> bool {
        self.values.get(field).is_some_and(|b| b.key.is_some())
    }

    pub fn raw(&self, field: &str) -> Option<&InputValue> {
        self.values.get(field).map(|b| &b.value)
    }

    /// Converts a field's value.
    ///
    /// Falls back to the type's empty value (`""`, `false`, `0`, an empty
    /// list, `None`) when the field has neither a supplied value nor a
    /// default.
    pub fn get<T: FromInputValue>(&self, field: &str) -> Result<T, BindError> {
        match self.values.get(field) {
            Some(BoundValue {
                value,
                key: Some(key),
            }) => T::from_input(value).map_err(|source| InputError::coercion(key, source).into()),
            Some(BoundValue { value, key: None }) => {
                T::from_input(value).map_err(|source| BindError::InvalidValue {
                    field: field.to_string(),
                    source,
                })
            }
            None => T::empty().ok_or_else(|| BindError::InvalidValue {
                field: field.to_string(),
                source: CoercionError::new(T::TYPE_NAME, ""),
            }),
        }
    }
}

/// A struct that can be bound from command-line input.
pub trait Parameters: Sized + Send + 'static {
    /// The field declarations. Called once per type; the result is cached.
    fn schema() -> ParameterSchema;

    /// Builds the object from resolved field values.
    fn from_bound(values: &BoundValues) -> Result<Self, BindError>;
}

/// The parameter type of commands that take no arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoParameters;

impl Parameters for NoParameters {
    fn schema() -> ParameterSchema {
        ParameterSchema::new()
    }

    fn from_bound(_values: &BoundValues) -> Result<Self, BindError> {
        Ok(NoParameters)
    }
}
