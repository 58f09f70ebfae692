//! Command handler call shapes.
//!
//! A handler is a plain function or closure in one of four shapes:
//!
//! | Shape | Signature |
//! |-------|-----------|
//! | [`CommandHandler::Sync`] | `Fn() -> R` |
//! | [`CommandHandler::SyncWith`] | `Fn(P) -> R` |
//! | [`CommandHandler::Async`] | `Fn() -> impl Future<Output = R>` |
//! | [`CommandHandler::AsyncWith`] | `Fn(P) -> impl Future<Output = R>` |
//!
//! where `P` implements [`Parameters`] and `R` implements
//! [`IntoCommandResult`]. The concrete parameter type is erased when the
//! handler is stored and recovered by downcasting when it is invoked.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::binder::ErasedParams;
use crate::{BindError, Parameters};

/// What a handler returns once converted.
pub type CommandResult = Result<(), anyhow::Error>;

/// Trait for types a handler may return.
///
/// # Example
///
/// ```rust
/// use parlance_dispatch::IntoCommandResult;
///
/// assert!(().into_command_result().is_ok());
///
/// let failed: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
/// assert_eq!(failed.into_command_result().unwrap_err().to_string(), "boom");
/// ```
pub trait IntoCommandResult {
    fn into_command_result(self) -> CommandResult;
}

impl IntoCommandResult for () {
    fn into_command_result(self) -> CommandResult {
        Ok(())
    }
}

impl<E> IntoCommandResult for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_command_result(self) -> CommandResult {
        self.map_err(Into::into)
    }
}

type SyncFn = Arc<dyn Fn() -> CommandResult + Send + Sync>;
type SyncWithFn = Arc<dyn Fn(ErasedParams) -> Result<CommandResult, BindError> + Send + Sync>;
type AsyncFn = Arc<dyn Fn() -> BoxFuture<'static, CommandResult> + Send + Sync>;
type AsyncWithFn =
    Arc<dyn Fn(ErasedParams) -> Result<BoxFuture<'static, CommandResult>, BindError> + Send + Sync>;

/// The four ways a command can be invoked.
#[derive(Clone)]
pub enum CommandHandler {
    Sync(SyncFn),
    SyncWith(SyncWithFn),
    Async(AsyncFn),
    AsyncWith(AsyncWithFn),
}

impl CommandHandler {
    pub fn sync<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoCommandResult,
    {
        Self::Sync(Arc::new(move || f().into_command_result()))
    }

    pub fn sync_with<P, F, R>(f: F) -> Self
    where
        P: Parameters,
        F: Fn(P) -> R + Send + Sync + 'static,
        R: IntoCommandResult,
    {
        Self::SyncWith(Arc::new(move |params: ErasedParams| {
            let params = downcast::<P>(params)?;
            Ok(f(params).into_command_result())
        }))
    }

    pub fn async_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::Async(Arc::new(move || {
            f().map(IntoCommandResult::into_command_result).boxed()
        }))
    }

    pub fn async_with<P, F, Fut, R>(f: F) -> Self
    where
        P: Parameters,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::AsyncWith(Arc::new(move |params: ErasedParams| {
            let params = downcast::<P>(params)?;
            Ok(f(params).map(IntoCommandResult::into_command_result).boxed())
        }))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_) | Self::AsyncWith(_))
    }

    pub fn takes_parameters(&self) -> bool {
        matches!(self, Self::SyncWith(_) | Self::AsyncWith(_))
    }
}

fn downcast<P: Parameters>(params: ErasedParams) -> Result<P, BindError> {
    params
        .downcast::<P>()
        .map(|p| *p)
        .map_err(|_| BindError::TypeMismatch {
            expected: std::any::type_name::<P>(),
        })
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Sync(_) => "Sync",
            Self::SyncWith(_) => "SyncWith",
            Self::Async(_) => "Async",
            Self::AsyncWith(_) => "AsyncWith",
        };
        f.debug_tuple("CommandHandler").field(&shape).finish()
    }
}
