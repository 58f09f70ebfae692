//! Multi-command execution.
//!
//! A line like `build && test && deploy` is split on `&&` and run in one of
//! three modes:
//!
//! | Mode | Ordering | Driver |
//! |------|----------|--------|
//! | [`run_sequential`] | in order, blocking | `Dispatcher::execute` |
//! | [`run_linear`] | in order, each awaited | `Dispatcher::execute_async` |
//! | [`run_parallel`] | none | `Dispatcher::execute_isolated` + `join_all` |
//!
//! Failures are collected into a [`BatchError`]. The sequential modes honor
//! [`FailurePolicy`]; parallel mode always waits for every command.

use std::fmt;

use futures::future::join_all;
use parlance_dispatch::{split_commands, DispatchError, Dispatcher};
use thiserror::Error;
use tracing::{debug, info};

use crate::FailurePolicy;

/// One failed command of a batch.
#[derive(Debug, Error)]
#[error("{command}: {error}")]
pub struct CommandFailure {
    /// The command text as it appeared in the batch.
    pub command: String,
    #[source]
    pub error: DispatchError,
}

/// Every failure of a batch, in command order.
#[derive(Debug)]
pub struct BatchError {
    failures: Vec<CommandFailure>,
}

impl BatchError {
    pub fn failures(&self) -> &[CommandFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<CommandFailure> {
        self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    fn check(failures: Vec<CommandFailure>) -> Result<(), BatchError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BatchError { failures })
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.as_slice() {
            [only] => write!(f, "{only}"),
            failures => {
                write!(f, "{} commands failed", failures.len())?;
                for failure in failures {
                    write!(f, "\n  {failure}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.failures.as_slice() {
            [only] => Some(&only.error),
            _ => None,
        }
    }
}

/// Runs every `&&`-separated command in order on the current thread.
pub fn run_sequential(
    dispatcher: &mut Dispatcher,
    input: &str,
    policy: FailurePolicy,
) -> Result<(), BatchError> {
    let commands = split_commands(input);
    info!(commands = commands.len(), mode = "sequential", "batch started");

    let mut failures = Vec::new();
    for command in commands {
        if let Err(error) = dispatcher.execute(command) {
            if record(&mut failures, command, error, policy) {
                break;
            }
        }
    }

    finish(failures, "sequential")
}

/// Runs every `&&`-separated command in order, awaiting each before the next
/// starts.
pub async fn run_linear(
    dispatcher: &mut Dispatcher,
    input: &str,
    policy: FailurePolicy,
) -> Result<(), BatchError> {
    let commands = split_commands(input);
    info!(commands = commands.len(), mode = "linear", "batch started");

    let mut failures = Vec::new();
    for command in commands {
        if let Err(error) = dispatcher.execute_async(command).await {
            if record(&mut failures, command, error, policy) {
                break;
            }
        }
    }

    finish(failures, "linear")
}

/// Starts every `&&`-separated command concurrently and waits for all of
/// them.
///
/// Each command binds against its own registry. The batch fails if any
/// command fails; the remaining commands still run to completion.
pub async fn run_parallel(dispatcher: &Dispatcher, input: &str) -> Result<(), BatchError> {
    let commands = split_commands(input);
    info!(commands = commands.len(), mode = "parallel", "batch started");

    let futures = commands.iter().map(|command| dispatcher.execute_isolated(command));
    let results = join_all(futures).await;

    let failures = commands
        .into_iter()
        .zip(results)
        .filter_map(|(command, result)| {
            result.err().map(|error| CommandFailure {
                command: command.to_string(),
                error,
            })
        })
        .collect();

    finish(failures, "parallel")
}

/// Returns true when the batch should stop.
fn record(
    failures: &mut Vec<CommandFailure>,
    command: &str,
    error: DispatchError,
    policy: FailurePolicy,
) -> bool {
    debug!(command, %error, "command failed");
    failures.push(CommandFailure {
        command: command.to_string(),
        error,
    });
    policy == FailurePolicy::Abort
}

fn finish(failures: Vec<CommandFailure>, mode: &'static str) -> Result<(), BatchError> {
    info!(failed = failures.len(), mode, "batch finished");
    BatchError::check(failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_dispatch::{CommandLookupBuilder, CommandSpec};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_dispatcher(counter: Arc<AtomicUsize>) -> Dispatcher {
        let (lookup, binders) = CommandLookupBuilder::new(false)
            .command(CommandSpec::sync("Tick", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .command(CommandSpec::sync("Fail", || {
                Err::<(), _>(anyhow::anyhow!("failed on purpose"))
            }))
            .build();
        Dispatcher::new(lookup, binders)
    }

    #[test]
    fn test_sequential_continue_runs_everything() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = counting_dispatcher(counter.clone());

        let err = run_sequential(
            &mut dispatcher,
            "tick && fail && tick && nope",
            FailurePolicy::Continue,
        )
        .unwrap_err();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(err.len(), 2);
        assert_eq!(err.failures()[0].command, "fail");
        assert_eq!(err.failures()[1].command, "nope");
        assert!(matches!(
            err.failures()[1].error,
            DispatchError::CommandNotFound { .. }
        ));
    }

    #[test]
    fn test_sequential_abort_stops_at_first_failure() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = counting_dispatcher(counter.clone());

        let err = run_sequential(&mut dispatcher, "tick && fail && tick", FailurePolicy::Abort)
            .unwrap_err();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_empty_piece_is_malformed() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut dispatcher = counting_dispatcher(counter.clone());

        let err = run_sequential(&mut dispatcher, "tick && && tick", FailurePolicy::Continue)
            .unwrap_err();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(matches!(err.failures()[0].error, DispatchError::MalformedInput));
    }

    #[test]
    fn test_display() {
        let single = BatchError {
            failures: vec![CommandFailure {
                command: "x".into(),
                error: DispatchError::CommandNotFound { name: "x".into() },
            }],
        };
        assert_eq!(single.to_string(), "x: Command 'x' not found.");

        let double = BatchError {
            failures: vec![
                CommandFailure {
                    command: "x".into(),
                    error: DispatchError::CommandNotFound { name: "x".into() },
                },
                CommandFailure {
                    command: "".into(),
                    error: DispatchError::MalformedInput,
                },
            ],
        };
        assert_eq!(
            double.to_string(),
            "2 commands failed\n  x: Command 'x' not found.\n  : No command was given."
        );
    }
}
