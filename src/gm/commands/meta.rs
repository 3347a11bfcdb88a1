//! Introspection commands: `commands`, `help`, `guid`.

use std::sync::Arc;

use anyhow::Result;

use super::super::context::CommandContext;
use super::super::registry::{CommandDescriptor, CommandRegistry, HandlerFuture};
use super::super::security::Permission;
use super::super::CommandError;
use crate::link::parse_packed_guid;

pub(super) fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(CommandDescriptor {
        name: "commands",
        permission: Permission::Commands,
        console_allowed: true,
        handler: commands,
        help: "commands - list the commands available to you",
    })?;
    registry.register(CommandDescriptor {
        name: "help",
        permission: Permission::Help,
        console_allowed: true,
        handler: help,
        help: "help <command> - describe a command",
    })?;
    registry.register(CommandDescriptor {
        name: "guid",
        permission: Permission::Guid,
        console_allowed: true,
        handler: guid,
        help: "guid <packed id> - decode a packed entity identifier and check whether it resolves",
    })?;
    Ok(())
}

fn commands<'a>(ctx: &'a mut CommandContext, _args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let registry = Arc::clone(&ctx.registry);
        let names: Vec<&str> = registry
            .iter()
            .filter(|d| ctx.checker.has_permission(&ctx.source, d.permission))
            .map(|d| d.name)
            .collect();
        ctx.reply(format!("Available commands: {}", names.join(", ")));
        Ok(())
    })
}

fn help<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let name = match args.split_whitespace().next() {
            Some(n) => n,
            None => {
                ctx.reply("Usage: help <command>");
                return Ok(());
            }
        };
        let registry = Arc::clone(&ctx.registry);
        // Concealed commands stay indistinguishable from unknown ones here,
        // same as at dispatch.
        let visible = registry.get(name).filter(|d| {
            ctx.checker.has_permission(&ctx.source, d.permission) || !ctx.policy.conceal_denied
        });
        match visible {
            Some(descriptor) => ctx.reply(descriptor.help),
            None => ctx.reply("There is no such command."),
        }
        Ok(())
    })
}

fn guid<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let token = args.split_whitespace().next().ok_or_else(|| {
            CommandError::BadArgument("packed identifier required (decimal or 0x hex)".into())
        })?;
        let entity = parse_packed_guid(token)?;
        let line = if let Some(live) = ctx.world.resolve_live(&entity) {
            format!("{} {} '{}' is live", live.kind, live.id, live.name)
        } else if let Some(persisted) = ctx.world.resolve_persisted(&entity) {
            format!(
                "{} {} '{}' is persisted but not live",
                persisted.kind, persisted.id, persisted.name
            )
        } else {
            format!("{} {} does not resolve", entity.kind_name(), entity.id())
        };
        ctx.reply(line);
        Ok(())
    })
}
