//! # Parlance demo shell
//!
//! A small command shell showing the three ways Parlance runs commands.
//!
//! Try:
//!   cargo run -p parlance-example -- greet --name=Ada
//!   cargo run -p parlance-example -- "sum --values=1,2,3 && greet -n=Grace --loud"
//!   cargo run -p parlance-example -- --mode parallel "fetch --url=a --delay=200 && fetch --url=b"
//!   cargo run -p parlance-example -- --interactive
//!   RUST_LOG=parlance=debug cargo run -p parlance-example -- help --expand

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::bail;
use clap::{Parser as ClapParser, ValueEnum};
use parlance::{
    BindError, BoundValues, CommandSpec, FieldSpec, ParameterSchema, Parameters, Parser,
    ParserConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI
// ============================================================================

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Sequential,
    Linear,
    Parallel,
}

#[derive(Debug, ClapParser)]
#[command(name = "parlance-demo", about = "Runs Parlance commands")]
struct Cli {
    /// TOML parser configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from stdin until `exit`
    #[arg(short, long)]
    interactive: bool,

    #[arg(long, value_enum, default_value = "sequential")]
    mode: Mode,

    /// Overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Commands, `&&`-separated
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,
}

// ============================================================================
// COMMANDS
// ============================================================================

struct GreetArgs {
    name: String,
    loud: bool,
}

impl Parameters for GreetArgs {
    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .field(
                FieldSpec::value("name")
                    .default_value("world")
                    .description("Who to greet"),
            )
            .field(FieldSpec::flag("loud").description("Shout the greeting"))
    }

    fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
        Ok(Self {
            name: values.get("name")?,
            loud: values.get("loud")?,
        })
    }
}

struct SumArgs {
    values: Vec<i64>,
}

impl Parameters for SumArgs {
    fn schema() -> ParameterSchema {
        ParameterSchema::new().field(
            FieldSpec::value("values")
                .required()
                .description("Comma-separated integers"),
        )
    }

    fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
        Ok(Self {
            values: values.get("values")?,
        })
    }
}

struct FetchArgs {
    url: String,
    delay: u64,
}

impl Parameters for FetchArgs {
    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .field(FieldSpec::value("url").required().description("What to fetch"))
            .field(
                FieldSpec::value("delay")
                    .default_value("100")
                    .description("Simulated latency in milliseconds"),
            )
    }

    fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
        Ok(Self {
            url: values.get("url")?,
            delay: values.get("delay")?,
        })
    }
}

fn greet(args: GreetArgs) {
    let greeting = format!("Hello, {}!", args.name);
    if args.loud {
        println!("{}", greeting.to_uppercase());
    } else {
        println!("{greeting}");
    }
}

fn sum(args: SumArgs) -> anyhow::Result<()> {
    if args.values.is_empty() {
        bail!("nothing to sum");
    }
    println!("{}", args.values.iter().sum::<i64>());
    Ok(())
}

async fn fetch(args: FetchArgs) {
    info!(url = args.url.as_str(), "fetching");
    tokio::time::sleep(Duration::from_millis(args.delay)).await;
    println!("fetched {} after {}ms", args.url, args.delay);
}

fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::sync_with("GreetCommand", greet)
            .named("greet")
            .description("Prints a greeting"),
        CommandSpec::sync_with("SumCommand", sum)
            .named("sum")
            .description("Adds integers"),
        CommandSpec::async_with("FetchCommand", fetch)
            .named("fetch")
            .description("Pretends to download something"),
    ]
}

// ============================================================================
// MAIN
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };

    let mut parser = Parser::builder()
        .config(config)
        .commands(commands())
        .build();

    if cli.interactive {
        let stdin = io::stdin();
        parser.repl(stdin.lock(), io::stdout()).run_async().await?;
        return Ok(());
    }

    // a single argument is already one command line
    let line = match cli.input.as_slice() {
        [single] => single.clone(),
        args => parlance::flatten_args(args),
    };
    match cli.mode {
        Mode::Sequential => parser.parse(&line)?,
        Mode::Linear => parser.parse_linear(&line).await?,
        Mode::Parallel => parser.parse_parallel(&line).await?,
    }
    Ok(())
}
