//! Command declarations and the alias lookup built from them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::naming::{derive_base_name, short_name, AliasCounter};
use crate::{
    BinderCache, CommandHandler, DuplicateCommandName, IntoCommandResult, ParameterType,
    Parameters,
};

/// Declaration of one command, before names are assigned.
///
/// The `identifier` is the handler's name as written in code
/// (`VersionBumpCommand`, `command_exit`, ...). Unless an explicit name is
/// given with [`named`](Self::named), the command's name is derived from it.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    identifier: String,
    name: Option<String>,
    description: Option<String>,
    parameter_type: ParameterType,
    handler: CommandHandler,
}

impl CommandSpec {
    fn new(
        identifier: impl Into<String>,
        parameter_type: ParameterType,
        handler: CommandHandler,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            description: None,
            parameter_type,
            handler,
        }
    }

    /// A synchronous command without parameters.
    pub fn sync<F, R>(identifier: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: IntoCommandResult,
    {
        Self::new(identifier, ParameterType::none(), CommandHandler::sync(f))
    }

    /// A synchronous command taking `P`.
    pub fn sync_with<P, F, R>(identifier: impl Into<String>, f: F) -> Self
    where
        P: Parameters,
        F: Fn(P) -> R + Send + Sync + 'static,
        R: IntoCommandResult,
    {
        Self::new(
            identifier,
            ParameterType::of::<P>(),
            CommandHandler::sync_with(f),
        )
    }

    /// An asynchronous command without parameters.
    pub fn async_fn<F, Fut, R>(identifier: impl Into<String>, f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::new(
            identifier,
            ParameterType::none(),
            CommandHandler::async_fn(f),
        )
    }

    /// An asynchronous command taking `P`.
    pub fn async_with<P, F, Fut, R>(identifier: impl Into<String>, f: F) -> Self
    where
        P: Parameters,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoCommandResult + 'static,
    {
        Self::new(
            identifier,
            ParameterType::of::<P>(),
            CommandHandler::async_with(f),
        )
    }

    /// Uses `name` instead of a name derived from the identifier.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The explicit name, or the derived one.
    pub fn base_name(&self) -> Option<String> {
        match &self.name {
            Some(name) => Some(name.clone()),
            None => derive_base_name(&self.identifier),
        }
    }
}

/// A registered command. Immutable once the lookup is built.
#[derive(Debug)]
pub struct CommandDescriptor {
    name: String,
    aliases: Vec<String>,
    identifier: String,
    description: Option<String>,
    parameter_type: ParameterType,
    handler: CommandHandler,
}

impl CommandDescriptor {
    /// The first alias assigned to the command.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every alias that resolves to this command, in assignment order.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    pub fn handler(&self) -> &CommandHandler {
        &self.handler
    }

    pub fn is_async(&self) -> bool {
        self.handler.is_async()
    }
}

/// Alias → command table.
#[derive(Debug, Default)]
pub struct CommandLookup {
    by_alias: HashMap<String, Arc<CommandDescriptor>>,
    commands: Vec<Arc<CommandDescriptor>>,
    collisions: Vec<DuplicateCommandName>,
}

impl CommandLookup {
    pub fn get(&self, alias: &str) -> Option<&Arc<CommandDescriptor>> {
        self.by_alias.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }

    /// Commands in declaration order.
    pub fn commands(&self) -> &[Arc<CommandDescriptor>] {
        &self.commands
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.by_alias.keys().map(String::as_str)
    }

    /// Aliases that were dropped because they were already taken.
    pub fn collisions(&self) -> &[DuplicateCommandName] {
        &self.collisions
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

/// Builds a [`CommandLookup`] and the binders its commands need.
///
/// # Example
///
/// ```
/// use parlance_dispatch::{CommandLookupBuilder, CommandSpec};
///
/// let (lookup, _binders) = CommandLookupBuilder::new(true)
///     .command(CommandSpec::sync("VersionBumpCommand", || ()))
///     .command(CommandSpec::sync("CommandExit", || ()))
///     .build();
///
/// assert!(lookup.contains("version-bump-command"));
/// assert!(lookup.contains("vbc"));
/// assert!(lookup.contains("exit"));
/// assert!(lookup.contains("e"));
/// ```
#[derive(Debug, Default)]
pub struct CommandLookupBuilder {
    generate_short_names: bool,
    specs: Vec<CommandSpec>,
}

impl CommandLookupBuilder {
    pub fn new(generate_short_names: bool) -> Self {
        Self {
            generate_short_names,
            specs: Vec::new(),
        }
    }

    pub fn command(mut self, spec: CommandSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn commands(mut self, specs: impl IntoIterator<Item = CommandSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Assigns aliases in declaration order.
    ///
    /// Every name (explicit, derived or short) goes through one shared
    /// counter: the first use of a name is kept as is and the Nth repeat
    /// becomes `name` + N. A suffixed alias that is still taken is recorded
    /// as a collision and skipped.
    pub fn build(self) -> (CommandLookup, BinderCache) {
        let mut lookup = CommandLookup::default();
        let mut binders = BinderCache::new();
        let mut counter = AliasCounter::new();

        for spec in self.specs {
            let Some(base) = spec.base_name() else {
                warn!(
                    identifier = spec.identifier.as_str(),
                    "command derives no name, skipping"
                );
                continue;
            };

            let mut candidates = vec![base.clone()];
            if self.generate_short_names {
                let short = short_name(&base);
                if !short.is_empty() {
                    candidates.push(short);
                }
            }

            let mut aliases = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                let alias = counter.claim(&candidate);
                if lookup.by_alias.contains_key(&alias) || aliases.contains(&alias) {
                    let collision = DuplicateCommandName {
                        alias,
                        command: spec.identifier.clone(),
                    };
                    warn!(%collision, "name duplicate");
                    lookup.collisions.push(collision);
                } else {
                    aliases.push(alias);
                }
            }

            let Some(name) = aliases.first().cloned() else {
                continue;
            };

            if !spec.parameter_type.is_none() {
                binders.ensure(&spec.parameter_type);
            }

            debug!(command = name.as_str(), ?aliases, "registered command");
            let descriptor = Arc::new(CommandDescriptor {
                name,
                aliases: aliases.clone(),
                identifier: spec.identifier,
                description: spec.description,
                parameter_type: spec.parameter_type,
                handler: spec.handler,
            });

            for alias in aliases {
                lookup.by_alias.insert(alias, descriptor.clone());
            }
            lookup.commands.push(descriptor);
        }

        (lookup, binders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(specs: Vec<CommandSpec>, short: bool) -> CommandLookup {
        CommandLookupBuilder::new(short).commands(specs).build().0
    }

    #[test]
    fn test_derived_and_short_names() {
        let lookup = build(vec![CommandSpec::sync("VersionBumpCommand", || ())], true);
        let cmd = lookup.get("vbc").unwrap();
        assert_eq!(cmd.name(), "version-bump-command");
        assert_eq!(cmd.aliases(), ["version-bump-command", "vbc"]);
    }

    #[test]
    fn test_short_names_disabled() {
        let lookup = build(vec![CommandSpec::sync("VersionBumpCommand", || ())], false);
        assert_eq!(lookup.len(), 1);
        assert!(!lookup.contains("vbc"));
    }

    #[test]
    fn test_explicit_name_replaces_derivation() {
        let lookup = build(
            vec![CommandSpec::sync("DownloadIconsCommand", || ()).named("icons")],
            true,
        );
        assert!(lookup.contains("icons"));
        assert!(lookup.contains("i"));
        assert!(!lookup.contains("download-icons-command"));
    }

    #[test]
    fn test_colliding_names_are_suffixed() {
        let lookup = build(
            vec![
                CommandSpec::sync("Foo", || ()),
                CommandSpec::sync("foo", || ()),
            ],
            false,
        );
        assert_eq!(lookup.get("foo").unwrap().identifier(), "Foo");
        assert_eq!(lookup.get("foo1").unwrap().identifier(), "foo");
        assert!(lookup.collisions().is_empty());
    }

    #[test]
    fn test_short_names_share_the_collision_space() {
        let lookup = build(
            vec![
                CommandSpec::sync("Build", || ()),
                CommandSpec::sync("Bump", || ()),
            ],
            true,
        );
        assert_eq!(lookup.get("b").unwrap().identifier(), "Build");
        assert_eq!(lookup.get("b1").unwrap().identifier(), "Bump");
    }

    #[test]
    fn test_suffixed_alias_already_taken_is_recorded() {
        let lookup = build(
            vec![
                CommandSpec::sync("a", || ()).named("foo1"),
                CommandSpec::sync("b", || ()).named("foo"),
                CommandSpec::sync("c", || ()).named("foo"),
            ],
            false,
        );
        assert_eq!(lookup.get("foo1").unwrap().identifier(), "a");
        assert_eq!(
            lookup.collisions(),
            [DuplicateCommandName {
                alias: "foo1".into(),
                command: "c".into(),
            }]
        );
        // "c" lost its only alias
        assert_eq!(lookup.commands().len(), 2);
    }

    #[test]
    fn test_nameless_command_is_skipped() {
        let lookup = build(vec![CommandSpec::sync("Command", || ())], true);
        assert!(lookup.is_empty());
        assert!(lookup.commands().is_empty());
    }

    #[test]
    fn test_short_equal_to_base_is_suffixed() {
        let lookup = build(
            vec![
                CommandSpec::sync("x", || ()).description("first"),
                CommandSpec::sync("x", || ()).description("second"),
            ],
            true,
        );
        assert_eq!(lookup.get("x").unwrap().aliases(), ["x", "x1"]);
        assert_eq!(lookup.get("x1").unwrap().description(), Some("first"));
        assert_eq!(lookup.get("x2").unwrap().aliases(), ["x2", "x3"]);
        assert_eq!(lookup.get("x3").unwrap().description(), Some("second"));
        assert!(lookup.collisions().is_empty());
    }
}
