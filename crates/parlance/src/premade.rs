//! Built-in `help` and `exit` commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parlance_dispatch::{
    BindError, BinderCache, BoundValues, CommandLookup, CommandSpec, DispatchError, FieldSpec,
    ParameterSchema, Parameters,
};

/// Arguments of the built-in `help` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpArgs {
    /// Show the arguments of this command only.
    pub name: String,
    /// Show every command together with its arguments.
    pub expand: bool,
}

impl Parameters for HelpArgs {
    fn schema() -> ParameterSchema {
        ParameterSchema::new()
            .field(
                FieldSpec::value("name")
                    .default_value("")
                    .description("Show the arguments of one command"),
            )
            .field(FieldSpec::flag("expand").description("Show every command with its arguments"))
    }

    fn from_bound(values: &BoundValues) -> Result<Self, BindError> {
        Ok(Self {
            name: values.get("name")?,
            expand: values.get("expand")?,
        })
    }
}

/// What `help` knows about one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub aliases: Vec<String>,
    pub description: String,
    /// `(name, description)` for each declared parameter.
    pub arguments: Vec<(String, String)>,
}

/// Snapshot of every registered command, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpCatalog {
    entries: Vec<HelpEntry>,
}

impl HelpCatalog {
    pub fn new(entries: Vec<HelpEntry>) -> Self {
        Self { entries }
    }

    pub fn from_lookup(lookup: &CommandLookup, binders: &BinderCache) -> Self {
        let entries = lookup
            .commands()
            .iter()
            .map(|command| {
                let arguments = binders
                    .get(command.parameter_type())
                    .map(|binder| {
                        binder
                            .schema()
                            .fields()
                            .iter()
                            .map(|f| (f.name().to_string(), f.help().unwrap_or_default().to_string()))
                            .collect()
                    })
                    .unwrap_or_default();

                HelpEntry {
                    aliases: command.aliases().to_vec(),
                    description: command.description().unwrap_or_default().to_string(),
                    arguments,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[HelpEntry] {
        &self.entries
    }

    pub fn find(&self, alias: &str) -> Option<&HelpEntry> {
        self.entries
            .iter()
            .find(|entry| entry.aliases.iter().any(|a| a == alias))
    }
}

/// Renders the help text for `args`.
///
/// * no name, not expanded: one line per command,
///   `aliases | description`, aliases longest first;
/// * `name`: one `- argument : description` line per argument;
/// * `expand`: every command line followed by its arguments.
///
/// ```
/// use parlance::{render_help, HelpArgs, HelpCatalog, HelpEntry};
///
/// let catalog = HelpCatalog::new(vec![HelpEntry {
///     aliases: vec!["bump".into(), "b".into()],
///     description: "Bumps versions".into(),
///     arguments: vec![("root".into(), "Repository root".into())],
/// }]);
///
/// assert_eq!(render_help(&catalog, &HelpArgs::default())?, "bump, b | Bumps versions\n");
///
/// let args = HelpArgs { name: "b".into(), expand: false };
/// assert_eq!(render_help(&catalog, &args)?, "- root : Repository root\n");
/// # Ok::<(), parlance_dispatch::DispatchError>(())
/// ```
pub fn render_help(catalog: &HelpCatalog, args: &HelpArgs) -> Result<String, DispatchError> {
    if args.expand {
        return Ok(render_listing(catalog, true));
    }
    if args.name.is_empty() {
        return Ok(render_listing(catalog, false));
    }

    let entry = catalog
        .find(&args.name)
        .ok_or_else(|| DispatchError::CommandNotFound {
            name: args.name.clone(),
        })?;

    let mut out = String::new();
    for (name, description) in &entry.arguments {
        out.push_str(&format!("- {name} : {description}\n"));
    }
    Ok(out)
}

fn render_listing(catalog: &HelpCatalog, expand: bool) -> String {
    let headers: Vec<String> = catalog
        .entries()
        .iter()
        .map(|entry| {
            let mut aliases: Vec<&str> = entry.aliases.iter().map(String::as_str).collect();
            aliases.sort_by(|a, b| b.len().cmp(&a.len()));
            aliases.join(", ")
        })
        .collect();

    let width = headers.iter().map(String::len).max().unwrap_or(0) + 1;
    let mut out = String::new();

    for (entry, header) in catalog.entries().iter().zip(&headers) {
        out.push_str(&format!("{header:<width$}| {}\n", entry.description));
        if expand {
            for (name, description) in &entry.arguments {
                let label = format!("    - {name}");
                out.push_str(&format!("{label:<width$}| {description}\n"));
            }
            out.push('\n');
        }
    }
    out
}

/// Liveness shared between a [`Repl`](crate::Repl) and the `exit` command.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn revive(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// The `help` command. The catalog is filled in once the lookup is built.
pub(crate) fn help_command(catalog: Arc<OnceCell<HelpCatalog>>) -> CommandSpec {
    CommandSpec::sync_with("CommandHelp", move |args: HelpArgs| {
        let catalog = catalog.get().cloned().unwrap_or_default();
        let text = render_help(&catalog, &args).map_err(anyhow::Error::from)?;
        println!("{text}");
        Ok::<(), anyhow::Error>(())
    })
    .named("help")
    .description("Prints this help text")
}

pub(crate) fn exit_command(liveness: Liveness) -> CommandSpec {
    CommandSpec::sync("CommandExit", move || liveness.stop())
        .named("exit")
        .description("Exits the CLI application.")
}
