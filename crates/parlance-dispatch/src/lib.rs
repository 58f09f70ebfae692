//! Command lookup, parameter binding and dispatch.
//!
//! `parlance-dispatch` turns a line such as `bump --root=/tmp --projects=A;B`
//! into exactly one call of a strongly typed handler.
//!
//! # Pipeline
//!
//! ```text
//! "bump --root=/tmp"
//!   → split_command_line      ("bump", "--root=/tmp")
//!   → CommandLookup           alias → CommandDescriptor
//!   → ParameterBinder         InputRegistry → BumpArgs
//!   → CommandHandler          Sync | SyncWith | Async | AsyncWith
//! ```
//!
//! # Declaring commands
//!
//! Commands are declared with [`CommandSpec`] and collected by
//! [`CommandLookupBuilder`], which derives names from identifiers
//! (`VersionBumpCommand` → `version-bump-command`, short `vbc`) and
//! suffixes colliding aliases (`foo`, `foo1`, ...).
//!
//! ```rust
//! use parlance_dispatch::{
//!     BindError, BoundValues, CommandLookupBuilder, CommandSpec, Dispatcher, FieldSpec,
//!     ParameterSchema, Parameters,
//! };
//!
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Parameters for Greet {
//!     fn schema() -> ParameterSchema {
//!         ParameterSchema::new().field(FieldSpec::value("name").required())
//!     }
//!
//!     fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
//!         Ok(Self { name: values.get("name")? })
//!     }
//! }
//!
//! let (lookup, binders) = CommandLookupBuilder::new(true)
//!     .command(CommandSpec::sync_with("GreetCommand", |args: Greet| {
//!         println!("hello {}", args.name);
//!     }))
//!     .build();
//!
//! let mut dispatcher = Dispatcher::new(lookup, binders);
//! dispatcher.execute("greet-command --name=Ada")?;
//! dispatcher.execute("gc -n=Grace")?;
//! # Ok::<(), parlance_dispatch::DispatchError>(())
//! ```

mod binder;
mod dispatch;
mod error;
mod handler;
mod lookup;
pub mod naming;
mod params;

pub use binder::{BinderCache, ErasedParams, ParameterBinder, ParameterType};
pub use dispatch::{split_command_line, split_commands, Dispatcher, Invocation};
pub use error::{BindError, DispatchError, DuplicateCommandName};
pub use handler::{CommandHandler, CommandResult, IntoCommandResult};
pub use lookup::{CommandDescriptor, CommandLookup, CommandLookupBuilder, CommandSpec};
pub use naming::{derive_base_name, short_name};
pub use params::{BoundValues, FieldKind, FieldSpec, NoParameters, ParameterSchema, Parameters};
