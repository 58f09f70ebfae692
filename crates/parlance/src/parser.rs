//! The [`Parser`] facade.

use std::io::{BufRead, Write};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parlance_dispatch::{
    CommandLookup, CommandLookupBuilder, CommandSpec, DispatchError, Dispatcher,
};
use parlance_input::flatten_args;
use tracing::{debug, warn};

use crate::batch::{run_linear, run_parallel, run_sequential};
use crate::premade::{exit_command, help_command};
use crate::{BatchError, HelpArgs, HelpCatalog, Liveness, ParserConfig, Repl};

/// Builder for [`Parser`].
///
/// # Example
///
/// ```rust
/// use parlance::{CommandSpec, Parser, ParserConfig};
///
/// let mut parser = Parser::builder()
///     .config(ParserConfig::default().with_exit(false))
///     .command(CommandSpec::sync("Hello", || println!("hello")).description("Says hello"))
///     .build();
///
/// parser.parse("hello && h")?;
/// assert!(parser.lookup().contains("help"));
/// assert!(!parser.lookup().contains("exit"));
/// # Ok::<(), parlance::BatchError>(())
/// ```
#[derive(Debug, Default)]
pub struct ParserBuilder {
    config: ParserConfig,
    commands: Vec<CommandSpec>,
}

impl ParserBuilder {
    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.commands.push(spec);
        self
    }

    pub fn commands(mut self, specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        self.commands.extend(specs);
        self
    }

    /// Registers the commands, then the enabled built-ins, and builds the
    /// lookup.
    pub fn build(self) -> Parser {
        let liveness = Liveness::new();
        let catalog = Arc::new(OnceCell::new());

        let mut builder =
            CommandLookupBuilder::new(self.config.generate_short_names).commands(self.commands);
        if self.config.enable_help {
            builder = builder.command(help_command(catalog.clone()));
        }
        if self.config.enable_exit {
            builder = builder.command(exit_command(liveness.clone()));
        }

        let (lookup, binders) = builder.build();
        if catalog
            .set(HelpCatalog::from_lookup(&lookup, &binders))
            .is_err()
        {
            warn!("help catalog was already filled, keeping the first one");
        }
        debug!(aliases = lookup.len(), "parser built");

        Parser {
            config: self.config,
            dispatcher: Dispatcher::new(lookup, binders),
            catalog,
            liveness,
        }
    }
}

/// Parses and dispatches command lines.
///
/// `parse`, `parse_linear` and `parse_parallel` accept several commands
/// joined with `&&` and apply the configured headless mode first.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    dispatcher: Dispatcher,
    catalog: Arc<OnceCell<HelpCatalog>>,
    liveness: Liveness,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn lookup(&self) -> &CommandLookup {
        self.dispatcher.lookup()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// False once the built-in `exit` has run.
    pub fn is_alive(&self) -> bool {
        self.liveness.is_alive()
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    /// Runs exactly one command, with no `&&` splitting or headless
    /// adjustment.
    pub fn execute(&mut self, line: &str) -> Result<(), DispatchError> {
        self.dispatcher.execute(line)
    }

    pub async fn execute_async(&mut self, line: &str) -> Result<(), DispatchError> {
        self.dispatcher.execute_async(line).await
    }

    /// Runs the commands one after another on the current thread.
    pub fn parse(&mut self, input: &str) -> Result<(), BatchError> {
        let input = self.config.adjust_for_headless(input);
        run_sequential(&mut self.dispatcher, &input, self.config.failure_policy)
    }

    /// Flattens process arguments into one line and runs it like
    /// [`parse`](Self::parse).
    pub fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<(), BatchError> {
        let line = flatten_args(args);
        self.parse(&line)
    }

    /// Runs the commands one after another, awaiting each.
    pub async fn parse_linear(&mut self, input: &str) -> Result<(), BatchError> {
        let input = self.config.adjust_for_headless(input);
        run_linear(&mut self.dispatcher, &input, self.config.failure_policy).await
    }

    /// Runs all commands concurrently and waits for every one.
    pub async fn parse_parallel(&self, input: &str) -> Result<(), BatchError> {
        let input = self.config.adjust_for_headless(input);
        run_parallel(&self.dispatcher, &input).await
    }

    /// The text the built-in `help` would print for `args`.
    pub fn help_text(&self, args: &HelpArgs) -> Result<String, DispatchError> {
        let catalog = self.catalog.get().cloned().unwrap_or_default();
        crate::render_help(&catalog, args)
    }

    /// An interactive loop reading from `input` and writing prompts and
    /// errors to `output`.
    pub fn repl<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Repl<'_, R, W> {
        Repl::new(self, input, output)
    }
}
