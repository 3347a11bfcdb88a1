//! Command descriptors and the build-once registry.
//!
//! Every command is registered exactly once at startup; after that the
//! registry is read-only and safe to share across concurrent dispatches
//! behind an `Arc` without locking. Lookup is exact first-token match,
//! case-sensitive - no fuzzy or prefix matching.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use anyhow::{bail, Result};

use super::context::CommandContext;
use super::security::Permission;
use super::CommandError;

/// Future a handler hands back to the dispatcher; driven to completion
/// before the invocation's outcome is reported.
pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>>;

/// A command body: parses its own argument remainder and reports through the
/// context plus the error taxonomy.
pub type CommandHandler = for<'a> fn(&'a mut CommandContext, &'a str) -> HandlerFuture<'a>;

/// One registered command. Immutable after registration.
pub struct CommandDescriptor {
    /// Unique, case-sensitive name matched against the first input token.
    pub name: &'static str,
    /// Permission the invoking account must hold.
    pub permission: Permission,
    /// Whether the non-interactive console may invoke this command.
    pub console_allowed: bool,
    pub handler: CommandHandler,
    /// Display text for `help`; not behaviorally significant.
    pub help: &'static str,
}

/// The command table. Build once, pass by reference, never mutate again.
#[derive(Default)]
pub struct CommandRegistry {
    table: BTreeMap<&'static str, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command. Duplicate names are a startup bug, not a runtime
    /// condition, so registration fails loudly.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        if self.table.contains_key(descriptor.name) {
            bail!("duplicate command name: {}", descriptor.name);
        }
        self.table.insert(descriptor.name, descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.table.get(name)
    }

    /// Descriptors in name order (BTreeMap iteration order).
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.table.values()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop<'a>(_ctx: &'a mut CommandContext, _args: &'a str) -> HandlerFuture<'a> {
        Box::pin(async { Ok(()) })
    }

    fn descriptor(name: &'static str) -> CommandDescriptor {
        CommandDescriptor {
            name,
            permission: Permission::Commands,
            console_allowed: true,
            handler: noop,
            help: "",
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor("kick")).unwrap();
        assert!(registry.register(descriptor("kick")).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(descriptor("kick")).unwrap();
        assert!(registry.get("kick").is_some());
        assert!(registry.get("KICK").is_none());
        assert!(registry.get("kic").is_none());
    }

    #[test]
    fn iteration_is_name_ordered() {
        let mut registry = CommandRegistry::new();
        for name in ["mute", "additem", "kick"] {
            registry.register(descriptor(name)).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(|d| d.name).collect();
        assert_eq!(names, ["additem", "kick", "mute"]);
    }
}
