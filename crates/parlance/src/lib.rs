//! # Parlance - free-form command lines for Rust programs
//!
//! Parlance turns lines like `bump --root=/tmp -p="A;B" --push && status`
//! into calls of strongly typed handlers. Commands are plain functions or
//! closures, sync or async, with or without a parameter struct.
//!
//! ## Crates
//!
//! | Crate | Role |
//! |-------|------|
//! | `parlance-input` | tokenizer, value store, typed coercion |
//! | `parlance-dispatch` | naming, binding, lookup, dispatch |
//! | `parlance` | configuration, batch modes, REPL, built-in commands |
//!
//! ## Quick start
//!
//! ```rust
//! use parlance::{
//!     BindError, BoundValues, CommandSpec, FieldSpec, ParameterSchema, Parameters, Parser,
//! };
//!
//! struct BumpArgs {
//!     root: String,
//!     push: bool,
//! }
//!
//! impl Parameters for BumpArgs {
//!     fn schema() -> ParameterSchema {
//!         ParameterSchema::new()
//!             .field(FieldSpec::value("root").required().description("Repository root"))
//!             .field(FieldSpec::flag("push").description("Push the new tag"))
//!     }
//!
//!     fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
//!         Ok(Self {
//!             root: values.get("root")?,
//!             push: values.get("push")?,
//!         })
//!     }
//! }
//!
//! let mut parser = Parser::builder()
//!     .command(
//!         CommandSpec::sync_with("VersionBumpCommand", |args: BumpArgs| {
//!             println!("bumping {} (push: {})", args.root, args.push);
//!         })
//!         .description("Bumps project versions"),
//!     )
//!     .build();
//!
//! parser.parse("version-bump-command --root=/tmp && vbc -r=/srv --push")?;
//! # Ok::<(), parlance::BatchError>(())
//! ```
//!
//! ## Modes
//!
//! * [`Parser::parse`]: commands run in order on the current thread.
//! * [`Parser::parse_linear`]: commands run in order, each awaited.
//! * [`Parser::parse_parallel`]: commands start together; the call fails
//!   if any of them fails.
//! * [`Repl`]: reads lines until the built-in `exit` runs.
//! * [`parse_startup`]: binds process arguments directly into a type.

mod batch;
mod config;
mod parser;
mod premade;
mod repl;
mod startup;

pub use batch::{run_linear, run_parallel, run_sequential, BatchError, CommandFailure};
pub use config::{ConfigError, FailurePolicy, HeadlessMode, ParserConfig};
pub use parser::{Parser, ParserBuilder};
pub use premade::{render_help, HelpArgs, HelpCatalog, HelpEntry, Liveness};
pub use repl::Repl;
pub use startup::{parse_startup, try_parse_startup};

pub use parlance_dispatch::{
    BindError, BoundValues, CommandDescriptor, CommandLookup, CommandSpec, DispatchError,
    Dispatcher, FieldKind, FieldSpec, NoParameters, ParameterSchema, Parameters,
};
pub use parlance_input::{flatten_args, FromInputValue, InputError, InputRegistry, InputValue};
