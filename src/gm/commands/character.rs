//! Character-state commands: `additem`, `additemset`, `setskill`,
//! `cooldown`.
//!
//! All of these act on the operator's own character and therefore require an
//! interactive session - the dispatcher keeps console input away from them.

use anyhow::Result;

use super::super::context::CommandContext;
use super::super::registry::{CommandDescriptor, CommandRegistry, HandlerFuture};
use super::super::security::Permission;
use super::super::CommandError;
use crate::link::{parse_simple_id, split_token, LinkKind};

pub(super) fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(CommandDescriptor {
        name: "additem",
        permission: Permission::AddItem,
        console_allowed: false,
        handler: additem,
        help: "additem <item link|id> [count] - grant an item to your character",
    })?;
    registry.register(CommandDescriptor {
        name: "additemset",
        permission: Permission::AddItemSet,
        console_allowed: false,
        handler: additemset,
        help: "additemset <item set link|id> - grant every item of a set",
    })?;
    registry.register(CommandDescriptor {
        name: "setskill",
        permission: Permission::SetSkill,
        console_allowed: false,
        handler: setskill,
        help: "setskill <skill link|id> <value> [max] - set a known skill",
    })?;
    registry.register(CommandDescriptor {
        name: "cooldown",
        permission: Permission::Cooldown,
        console_allowed: false,
        handler: cooldown,
        help: "cooldown [spell link|id] - clear one spell cooldown, or all of them",
    })?;
    Ok(())
}

fn additem<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let session = ctx.require_session()?;
        let guid = session.guid;
        let who = session.character.clone();
        let (token, rest) = split_token(args);
        if token.is_empty() {
            return Err(CommandError::BadArgument(
                "usage: additem <item link|id> [count]".into(),
            ));
        }
        let item = parse_simple_id(token, LinkKind::Item)?;
        let count: u32 = match rest.split_whitespace().next() {
            Some(c) => c
                .parse()
                .map_err(|_| CommandError::BadArgument(format!("bad count '{c}'")))?,
            None => 1,
        };
        if count == 0 {
            return Err(CommandError::BadArgument("count must be at least 1".into()));
        }
        if !ctx.world.item_exists(item) {
            return Err(CommandError::Failed(format!("invalid item id {item}")));
        }
        if !ctx.world.give_item(guid, item, count) {
            return Err(CommandError::Failed("item could not be granted".into()));
        }
        ctx.reply(format!("Added {count}x item {item} to {who}"));
        Ok(())
    })
}

fn additemset<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let session = ctx.require_session()?;
        let guid = session.guid;
        let who = session.character.clone();
        let (token, _) = split_token(args);
        if token.is_empty() {
            return Err(CommandError::BadArgument(
                "usage: additemset <item set link|id>".into(),
            ));
        }
        let set = parse_simple_id(token, LinkKind::ItemSet)?;
        let items = ctx.world.item_set_items(set);
        if items.is_empty() {
            return Err(CommandError::Failed(format!(
                "item set {set} is empty or unknown"
            )));
        }
        let mut granted = 0;
        for item in &items {
            if ctx.world.give_item(guid, *item, 1) {
                granted += 1;
            }
        }
        ctx.reply(format!("Added {granted} items from set {set} to {who}"));
        Ok(())
    })
}

fn setskill<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let session = ctx.require_session()?;
        let guid = session.guid;
        let who = session.character.clone();
        let usage =
            || CommandError::BadArgument("usage: setskill <skill link|id> <value> [max]".into());
        let (token, rest) = split_token(args);
        if token.is_empty() {
            return Err(usage());
        }
        let skill = parse_simple_id(token, LinkKind::Skill)?;
        let mut parts = rest.split_whitespace();
        let value: u32 = parts
            .next()
            .ok_or_else(usage)?
            .parse()
            .map_err(|_| CommandError::BadArgument("bad skill value".into()))?;
        let max: u32 = match parts.next() {
            Some(m) => m
                .parse()
                .map_err(|_| CommandError::BadArgument("bad skill max".into()))?,
            None => value,
        };
        if value == 0 {
            return Err(CommandError::BadArgument(
                "skill value must be at least 1".into(),
            ));
        }
        if max < value {
            return Err(CommandError::BadArgument(
                "skill max must not be below the value".into(),
            ));
        }
        if !ctx.world.skill_exists(skill) {
            return Err(CommandError::Failed(format!("invalid skill id {skill}")));
        }
        if !ctx.world.set_skill(guid, skill, value, max) {
            return Err(CommandError::Failed(format!(
                "{who} does not know skill {skill}"
            )));
        }
        ctx.reply(format!("Skill {skill} for {who} set to {value}/{max}"));
        Ok(())
    })
}

fn cooldown<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let session = ctx.require_session()?;
        let guid = session.guid;
        let who = session.character.clone();
        let (token, _) = split_token(args);
        if token.is_empty() {
            ctx.world.clear_cooldown(guid, None);
            ctx.reply(format!("All cooldowns cleared for {who}"));
        } else {
            let spell = parse_simple_id(token, LinkKind::Spell)?;
            if !ctx.world.spell_exists(spell) {
                return Err(CommandError::Failed(format!("invalid spell id {spell}")));
            }
            ctx.world.clear_cooldown(guid, Some(spell));
            ctx.reply(format!("Cooldown of spell {spell} cleared for {who}"));
        }
        Ok(())
    })
}
