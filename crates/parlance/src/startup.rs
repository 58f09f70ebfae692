//! Binding process arguments straight into a parameter type.
//!
//! For programs that take options at launch instead of dispatching
//! commands:
//!
//! ```rust
//! use parlance::{parse_startup, BindError, BoundValues, FieldSpec, ParameterSchema, Parameters};
//!
//! struct Options {
//!     port: u16,
//!     verbose: bool,
//! }
//!
//! impl Parameters for Options {
//!     fn schema() -> ParameterSchema {
//!         ParameterSchema::new()
//!             .field(FieldSpec::value("port").default_value("8080"))
//!             .field(FieldSpec::flag("verbose"))
//!     }
//!
//!     fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
//!         Ok(Self {
//!             port: values.get("port")?,
//!             verbose: values.get("verbose")?,
//!         })
//!     }
//! }
//!
//! let options: Options = parse_startup(&["-p=9000", "--verbose"])?;
//! assert_eq!(options.port, 9000);
//! assert!(options.verbose);
//! # Ok::<(), BindError>(())
//! ```

use parlance_dispatch::{BindError, ParameterBinder, Parameters};
use parlance_input::InputRegistry;
use tracing::debug;

/// Binds `args` into `P`.
///
/// `args` are the arguments after the program name. They are flattened
/// into one line and tokenized into a fresh registry.
pub fn parse_startup<P, S>(args: &[S]) -> Result<P, BindError>
where
    P: Parameters,
    S: AsRef<str>,
{
    let mut registry = InputRegistry::new();
    registry.ingest_args(args);
    ParameterBinder::of::<P>().bind_as(&registry)
}

/// Like [`parse_startup`], returning `None` on any failure.
pub fn try_parse_startup<P, S>(args: &[S]) -> Option<P>
where
    P: Parameters,
    S: AsRef<str>,
{
    match parse_startup(args) {
        Ok(params) => Some(params),
        Err(e) => {
            debug!(error = %e, "startup arguments rejected");
            None
        }
    }
}
