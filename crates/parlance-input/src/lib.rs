//! Tokenization and typed lookup for command-line input.
//!
//! `parlance-input` turns one line of command-line text into a key/value
//! store, then hands values back out as concrete Rust types.
//!
//! # Quick Start
//!
//! ```
//! use parlance_input::InputRegistry;
//!
//! let mut registry = InputRegistry::new();
//! registry.ingest_str(r#"--root=/tmp --projects="A;B" --push=false"#);
//!
//! let root: String = registry.get("--root")?;
//! let push: bool = registry.get_by_names("--push", "-p")?;
//! let verbose: Option<bool> = registry.get_optional("--verbose")?;
//!
//! assert_eq!(root, "/tmp");
//! assert!(!push);
//! assert_eq!(verbose, None);
//! # Ok::<(), parlance_input::InputError>(())
//! ```
//!
//! # Grammar
//!
//! ```text
//! --key=value  -k="quoted value"   → "--key" / "-k"
//! --flag  -f                       → true
//! "standalone quoted"              → quotedString_0, quotedString_1, ...
//! bare                             → positional_0, positional_1, ...
//! ```
//!
//! The grammar is fixed. Values that look like `true`/`false` are stored as
//! booleans; everything else is stored as text and converted on lookup via
//! [`FromInputValue`].
//!
//! # Reuse
//!
//! A registry is meant to be cleared and reused between command lines. Use
//! [`InputRegistry::scoped`] to get a guard that clears it when dropped, or
//! call [`InputRegistry::clear`] directly.

mod error;
mod flatten;
mod registry;
pub mod tokenizer;
mod value;

pub use error::{CoercionError, InputError};
pub use flatten::flatten_args;
pub use registry::{InputRegistry, RegistryGuard};
pub use tokenizer::{tokenize, IngestionCursor, ParameterEntry};
pub use value::{FromInputValue, InputValue};
