//! Command line resolution and invocation.
//!
//! One command line moves through these states:
//!
//! ```text
//! AwaitingInput → NameExtracted → CommandResolved → ParametersBound → Invoked
//! ```
//!
//! Any failing transition aborts that line; nothing is invoked.

use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use parlance_input::InputRegistry;
use tracing::debug;

use crate::binder::ErasedParams;
use crate::{
    BinderCache, CommandDescriptor, CommandHandler, CommandLookup, DispatchError, NoParameters,
};

/// Splits a line into independent commands on `&&` outside double quotes.
///
/// Pieces are trimmed; empty pieces are kept so callers can reject them.
///
/// ```
/// use parlance_dispatch::split_commands;
///
/// assert_eq!(split_commands("a && b --x=1"), vec!["a", "b --x=1"]);
/// assert_eq!(split_commands(r#"echo "x && y""#), vec![r#"echo "x && y""#]);
/// ```
pub fn split_commands(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let total_quotes = bytes.iter().filter(|&&b| b == b'"').count();
    let mut quotes_seen = 0;
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => quotes_seen += 1,
            // a separator counts only if an even number of quotes follows it
            b'&' if bytes.get(i + 1) == Some(&b'&') && (total_quotes - quotes_seen) % 2 == 0 => {
                pieces.push(line[start..i].trim());
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    pieces.push(line[start..].trim());
    pieces
}

/// Splits a command line into the command name and the argument tail.
///
/// Returns `None` for empty or whitespace-only input.
pub fn split_command_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((name, tail)) => Some((name, tail.trim_start())),
        None => Some((line, "")),
    }
}

/// A command with its parameters bound, ready to run.
pub struct Invocation {
    command: Arc<CommandDescriptor>,
    params: Option<ErasedParams>,
}

impl Invocation {
    pub fn command(&self) -> &Arc<CommandDescriptor> {
        &self.command
    }

    /// Runs the handler on the current thread. Asynchronous handlers are
    /// driven to completion with a local executor.
    pub fn invoke(self) -> Result<(), DispatchError> {
        futures::executor::block_on(self.into_future())
    }

    /// Runs the handler, awaiting it if it is asynchronous.
    pub async fn invoke_async(self) -> Result<(), DispatchError> {
        self.into_future().await
    }

    /// Turns the invocation into an owned future. Nothing runs until it is
    /// polled.
    pub fn into_future(self) -> BoxFuture<'static, Result<(), DispatchError>> {
        let Invocation { command, params } = self;

        async move {
            let name = command.name();
            let result = match (command.handler(), params) {
                (CommandHandler::Sync(f), _) => f(),
                (CommandHandler::SyncWith(f), Some(params)) => {
                    f(params).map_err(|e| DispatchError::binding(name, e))?
                }
                (CommandHandler::Async(f), _) => f().await,
                (CommandHandler::AsyncWith(f), Some(params)) => {
                    f(params)
                        .map_err(|e| DispatchError::binding(name, e))?
                        .await
                }
                (_, None) => return Err(missing_params(&command)),
            };

            debug!(command = name, ok = result.is_ok(), "invoked");
            result.map_err(DispatchError::InvocationFailed)
        }
        .boxed()
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("command", &self.command.name())
            .field("bound", &self.params.is_some())
            .finish()
    }
}

fn missing_params(command: &CommandDescriptor) -> DispatchError {
    DispatchError::ParameterTypeUnregistered {
        type_name: command.parameter_type().name(),
    }
}

/// Resolves command lines against a [`CommandLookup`] and runs them.
///
/// The dispatcher owns one [`InputRegistry`] that is cleared after every
/// line. The lookup and binders are shared read-only and may be cloned into
/// other dispatchers or tasks.
///
/// # Example
///
/// ```
/// use parlance_dispatch::{CommandLookupBuilder, CommandSpec, Dispatcher};
///
/// let (lookup, binders) = CommandLookupBuilder::new(true)
///     .command(CommandSpec::sync("Greet", || println!("hello")))
///     .build();
///
/// let mut dispatcher = Dispatcher::new(lookup, binders);
/// dispatcher.execute("greet")?;
/// dispatcher.execute("g")?;
/// assert!(dispatcher.execute("nope").is_err());
/// # Ok::<(), parlance_dispatch::DispatchError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    lookup: Arc<CommandLookup>,
    binders: Arc<BinderCache>,
    registry: InputRegistry,
}

impl Dispatcher {
    pub fn new(lookup: impl Into<Arc<CommandLookup>>, binders: impl Into<Arc<BinderCache>>) -> Self {
        Self {
            lookup: lookup.into(),
            binders: binders.into(),
            registry: InputRegistry::new(),
        }
    }

    pub fn lookup(&self) -> &Arc<CommandLookup> {
        &self.lookup
    }

    pub fn binders(&self) -> &Arc<BinderCache> {
        &self.binders
    }

    /// Resolves one command line up to bound parameters, without invoking.
    pub fn resolve(&mut self, line: &str) -> Result<Invocation, DispatchError> {
        let mut registry = self.registry.scoped();
        resolve_in(&self.lookup, &self.binders, &mut registry, line)
    }

    /// Resolves and runs one command line on the current thread.
    pub fn execute(&mut self, line: &str) -> Result<(), DispatchError> {
        self.resolve(line)?.invoke()
    }

    /// Resolves one command line and awaits its handler.
    pub async fn execute_async(&mut self, line: &str) -> Result<(), DispatchError> {
        self.resolve(line)?.invoke_async().await
    }

    /// Resolves one command line against a fresh registry and returns an
    /// owned future that runs it.
    ///
    /// Used to run several commands concurrently: each binds against its own
    /// values and none touches the dispatcher's registry.
    pub fn execute_isolated(&self, line: &str) -> BoxFuture<'static, Result<(), DispatchError>> {
        let mut registry = InputRegistry::new();
        match resolve_in(&self.lookup, &self.binders, &mut registry, line) {
            Ok(invocation) => invocation.into_future(),
            Err(e) => future::ready(Err(e)).boxed(),
        }
    }
}

fn resolve_in(
    lookup: &CommandLookup,
    binders: &BinderCache,
    registry: &mut InputRegistry,
    line: &str,
) -> Result<Invocation, DispatchError> {
    let (name, tail) = split_command_line(line).ok_or(DispatchError::MalformedInput)?;
    debug!(command = name, "name extracted");

    let command = lookup
        .get(name)
        .cloned()
        .ok_or_else(|| DispatchError::CommandNotFound {
            name: name.to_string(),
        })?;
    debug!(command = command.name(), alias = name, "command resolved");

    if command.parameter_type().is_none() {
        let params = command
            .handler()
            .takes_parameters()
            .then(|| Box::new(NoParameters) as ErasedParams);
        return Ok(Invocation { command, params });
    }

    let binder = binders.get(command.parameter_type()).ok_or_else(|| {
        DispatchError::ParameterTypeUnregistered {
            type_name: command.parameter_type().name(),
        }
    })?;

    registry.ingest_str(tail);
    let params = binder
        .bind(registry)
        .map_err(|e| DispatchError::binding(command.name(), e))?;
    debug!(command = command.name(), "parameters bound");

    Ok(Invocation {
        command,
        params: Some(params),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_commands_basic() {
        assert_eq!(split_commands("a"), vec!["a"]);
        assert_eq!(split_commands("a&&b"), vec!["a", "b"]);
        assert_eq!(split_commands(" a  &&  b && c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_commands_keeps_empty_pieces() {
        assert_eq!(split_commands("a && && b"), vec!["a", "", "b"]);
        assert_eq!(split_commands(""), vec![""]);
    }

    #[test]
    fn test_split_commands_respects_quotes() {
        assert_eq!(
            split_commands(r#"say --text="x && y" && other"#),
            vec![r#"say --text="x && y""#, "other"]
        );
    }

    #[test]
    fn test_split_commands_triple_ampersand() {
        assert_eq!(split_commands("a &&& b"), vec!["a", "& b"]);
    }

    #[test]
    fn test_split_command_line() {
        assert_eq!(split_command_line("bump --root=/tmp"), Some(("bump", "--root=/tmp")));
        assert_eq!(split_command_line("  help  "), Some(("help", "")));
        assert_eq!(split_command_line("a \t b c"), Some(("a", "b c")));
        assert_eq!(split_command_line("   "), None);
    }
}
