//! Dynamically typed values and the typed parser registry.
//!
//! The tokenizer only knows two shapes of value: text and booleans. Everything
//! else is produced on lookup through [`FromInputValue`], which plays the role
//! of a compile-time registered table of `InputValue → T` parsers. A failed
//! conversion is an ordinary [`CoercionError`], never a panic.

use std::fmt;
use std::path::PathBuf;

use crate::CoercionError;

/// A raw value stored in the [`InputRegistry`](crate::InputRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputValue {
    /// Text with surrounding quotes already stripped.
    Text(String),
    /// A flag or a boolean literal.
    Bool(bool),
}

impl InputValue {
    /// Parses `true` / `false` case-insensitively, ignoring surrounding whitespace.
    pub fn parse_bool_literal(text: &str) -> Option<bool> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Some(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(s) => Some(s),
            InputValue::Bool(_) => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            InputValue::Bool(b) => Some(*b),
            InputValue::Text(_) => None,
        }
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, InputValue::Bool(_))
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Text(s) => f.write_str(s),
            InputValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl From<bool> for InputValue {
    fn from(b: bool) -> Self {
        InputValue::Bool(b)
    }
}

/// Conversion from a stored [`InputValue`] into a concrete field type.
///
/// # Example
///
/// ```
/// use parlance_input::{FromInputValue, InputValue};
///
/// let port = u16::from_input(&InputValue::from("8080")).unwrap();
/// assert_eq!(port, 8080);
///
/// assert!(u16::from_input(&InputValue::Bool(true)).is_err());
/// ```
pub trait FromInputValue: Sized {
    /// Human-readable type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Convert the stored value.
    fn from_input(value: &InputValue) -> Result<Self, CoercionError>;

    /// The value an optional field takes when nothing was supplied and no
    /// default was declared. `None` means the type has no natural empty value.
    fn empty() -> Option<Self> {
        None
    }
}

impl FromInputValue for InputValue {
    const TYPE_NAME: &'static str = "value";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

impl FromInputValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        Ok(value.to_string())
    }

    fn empty() -> Option<Self> {
        Some(String::new())
    }
}

impl FromInputValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        match value {
            InputValue::Bool(b) => Ok(*b),
            InputValue::Text(s) => InputValue::parse_bool_literal(s)
                .ok_or_else(|| CoercionError::new(Self::TYPE_NAME, s.as_str())),
        }
    }

    fn empty() -> Option<Self> {
        Some(false)
    }
}

macro_rules! impl_from_str_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromInputValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
                    match value {
                        InputValue::Text(s) => s
                            .trim()
                            .parse::<$ty>()
                            .map_err(|_| CoercionError::new(Self::TYPE_NAME, s.as_str())),
                        InputValue::Bool(b) => Err(CoercionError::new(Self::TYPE_NAME, b.to_string())),
                    }
                }

                fn empty() -> Option<Self> {
                    Some(<$ty>::default())
                }
            }
        )*
    };
}

impl_from_str_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromInputValue for char {
    const TYPE_NAME: &'static str = "char";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        let text = value.to_string();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CoercionError::new(Self::TYPE_NAME, text)),
        }
    }
}

impl FromInputValue for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        match value {
            InputValue::Text(s) => Ok(PathBuf::from(s)),
            InputValue::Bool(b) => Err(CoercionError::new(Self::TYPE_NAME, b.to_string())),
        }
    }

    fn empty() -> Option<Self> {
        Some(PathBuf::new())
    }
}

impl<T: FromInputValue> FromInputValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        T::from_input(value).map(Some)
    }

    fn empty() -> Option<Self> {
        Some(None)
    }
}

/// Lists are written comma-separated: `--tags=a,b,c`.
impl<T: FromInputValue> FromInputValue for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn from_input(value: &InputValue) -> Result<Self, CoercionError> {
        match value {
            InputValue::Bool(_) => Ok(vec![T::from_input(value)?]),
            InputValue::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| T::from_input(&InputValue::Text(part.to_string())))
                .collect(),
        }
    }

    fn empty() -> Option<Self> {
        Some(Vec::new())
    }
}
