//! Interactive read-dispatch loop.

use std::io::{self, BufRead, Write};

use parlance_dispatch::split_commands;
use tracing::debug;

use crate::Parser;

/// Reads lines from `R`, dispatches them and writes prompts and errors to
/// `W` until `exit` runs or the input ends.
///
/// Each line may hold several `&&`-separated commands. A failing command
/// prints its error and the loop continues with the next one.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use parlance::Parser;
///
/// let mut parser = Parser::builder().build();
/// let mut out = Vec::new();
/// parser.repl(Cursor::new("nope\nexit\n"), &mut out).run()?;
///
/// let out = String::from_utf8(out).unwrap();
/// assert_eq!(out, "> : Command 'nope' not found.\n> : ");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Repl<'p, R, W> {
    parser: &'p mut Parser,
    input: R,
    output: W,
}

impl<'p, R: BufRead, W: Write> Repl<'p, R, W> {
    pub fn new(parser: &'p mut Parser, input: R, output: W) -> Self {
        Self {
            parser,
            input,
            output,
        }
    }

    /// Runs every command on the current thread.
    pub fn run(mut self) -> io::Result<()> {
        while let Some(line) = self.next_line()? {
            for command in split_commands(&line) {
                if let Err(e) = self.parser.execute(command) {
                    writeln!(self.output, "{e}")?;
                }
            }
        }
        Ok(())
    }

    /// Like [`run`](Self::run), awaiting asynchronous handlers.
    pub async fn run_async(mut self) -> io::Result<()> {
        while let Some(line) = self.next_line()? {
            for command in split_commands(&line) {
                if let Err(e) = self.parser.execute_async(command).await {
                    writeln!(self.output, "{e}")?;
                }
            }
        }
        Ok(())
    }

    /// Prompts until a non-blank line arrives. `None` once the parser is
    /// stopped or the input is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        while self.parser.is_alive() {
            write!(self.output, "{}", self.parser.config().cli_cursor)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!("input closed");
                return Ok(None);
            }

            let line = line.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
        Ok(None)
    }
}
