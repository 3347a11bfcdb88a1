//! Account-level moderation commands: `kick`, `mute`, `unmute`, `warn`,
//! `pinfo`, `revive`.
//!
//! `mute` and `warn` use the strict security comparison: punitive account
//! actions between peers of equal authority are disallowed even though
//! equal-level actions pass the ordinary check.

use anyhow::Result;
use chrono::{Duration, Utc};
use log::info;

use super::super::context::CommandContext;
use super::super::registry::{CommandDescriptor, CommandRegistry, HandlerFuture};
use super::super::security::{level_name, Permission};
use super::super::CommandError;
use crate::logutil::escape_log;
use crate::world::MuteInfo;

const NO_REASON: &str = "No reason given";

pub(super) fn register(registry: &mut CommandRegistry) -> Result<()> {
    registry.register(CommandDescriptor {
        name: "kick",
        permission: Permission::Kick,
        console_allowed: true,
        handler: kick,
        help: "kick [player] [reason] - disconnect a player",
    })?;
    registry.register(CommandDescriptor {
        name: "mute",
        permission: Permission::Mute,
        console_allowed: true,
        handler: mute,
        help: "mute [player] <minutes> [reason] - disable an account's chat",
    })?;
    registry.register(CommandDescriptor {
        name: "unmute",
        permission: Permission::Unmute,
        console_allowed: true,
        handler: unmute,
        help: "unmute [player] - lift an account's chat restriction",
    })?;
    registry.register(CommandDescriptor {
        name: "warn",
        permission: Permission::Warn,
        console_allowed: true,
        handler: warn,
        help: "warn <player> [reason] - record a warning; enough of them mute the account",
    })?;
    registry.register(CommandDescriptor {
        name: "pinfo",
        permission: Permission::PlayerInfo,
        console_allowed: true,
        handler: pinfo,
        help: "pinfo [player] - account and character summary, online or offline",
    })?;
    registry.register(CommandDescriptor {
        name: "revive",
        permission: Permission::Revive,
        console_allowed: true,
        handler: revive,
        help: "revive [player] - bring a dead player back",
    })?;
    Ok(())
}

/// Split the leading whitespace-delimited token off `args`.
fn split_first(args: &str) -> (Option<&str>, &str) {
    let trimmed = args.trim_start();
    if trimmed.is_empty() {
        return (None, "");
    }
    match trimmed.split_once(|c: char| c.is_whitespace()) {
        Some((first, rest)) => (Some(first), rest),
        None => (Some(trimmed), ""),
    }
}

fn kick<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let (name, rest) = split_first(args);
        let reason = rest.trim();
        let reason = if reason.is_empty() { NO_REASON } else { reason };
        let target = ctx.player_target(name)?;
        ctx.ensure_authority_over(&target, false)?;
        if !target.online {
            return Err(CommandError::Failed(format!("{} is not online", target.name)));
        }
        if !ctx.world.kick_player(target.guid, reason) {
            return Err(CommandError::Failed(format!(
                "{} could not be kicked",
                target.name
            )));
        }
        info!(
            target: "gmshell::audit",
            "kick target={} by={} reason={}",
            target.name,
            ctx.source.actor_name(),
            escape_log(reason)
        );
        ctx.reply(format!("{} kicked: {}", target.name, reason));
        Ok(())
    })
}

fn mute<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        // The name is optional: a bare duration mutes the selected player.
        let (first, rest) = split_first(args);
        let first = first.ok_or_else(|| {
            CommandError::BadArgument("usage: mute [player] <minutes> [reason]".into())
        })?;
        let (name, minutes_token, tail) = if first.bytes().all(|b| b.is_ascii_digit()) {
            (None, first, rest)
        } else {
            let (minutes, tail) = split_first(rest);
            let minutes = minutes.ok_or_else(|| {
                CommandError::BadArgument("mute duration in minutes required".into())
            })?;
            (Some(first), minutes, tail)
        };
        let minutes: i64 = minutes_token
            .parse()
            .map_err(|_| CommandError::BadArgument(format!("bad duration '{minutes_token}'")))?;
        if minutes < 1 {
            return Err(CommandError::BadArgument(
                "mute duration must be at least one minute".into(),
            ));
        }
        let reason = tail.trim();
        let reason = if reason.is_empty() { NO_REASON } else { reason };

        let target = ctx.player_target(name)?;
        ctx.ensure_authority_over(&target, true)?;
        let mute = MuteInfo {
            until: Utc::now() + Duration::minutes(minutes),
            reason: reason.to_string(),
            muted_by: ctx.source.actor_name(),
        };
        if !ctx.world.set_mute(target.account, mute) {
            return Err(CommandError::TargetNotFound);
        }
        info!(
            target: "gmshell::audit",
            "mute target={} account={} minutes={} by={} reason={}",
            target.name,
            target.account,
            minutes,
            ctx.source.actor_name(),
            escape_log(reason)
        );
        if target.online {
            ctx.reply(format!(
                "Chat disabled for {} for {} min: {}",
                target.name, minutes, reason
            ));
        } else {
            ctx.reply(format!(
                "{} is offline; the mute takes effect at next login ({} min): {}",
                target.name, minutes, reason
            ));
        }
        Ok(())
    })
}

fn unmute<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let (name, _) = split_first(args);
        let target = ctx.player_target(name)?;
        ctx.ensure_authority_over(&target, false)?;
        if !ctx.world.clear_mute(target.account) {
            return Err(CommandError::Failed(format!("{} is not muted", target.name)));
        }
        info!(
            target: "gmshell::audit",
            "unmute target={} by={}",
            target.name,
            ctx.source.actor_name()
        );
        ctx.reply(format!("{} can speak again", target.name));
        Ok(())
    })
}

fn warn<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let (name, rest) = split_first(args);
        let name =
            name.ok_or_else(|| CommandError::BadArgument("usage: warn <player> [reason]".into()))?;
        let reason = rest.trim();
        let reason = if reason.is_empty() { NO_REASON } else { reason };
        let target = ctx.player_target(Some(name))?;
        ctx.ensure_authority_over(&target, true)?;

        let threshold = ctx.policy.warn_threshold;
        let proc = ctx
            .world
            .record_warning(target.account, threshold)
            .ok_or(CommandError::TargetNotFound)?;
        info!(
            target: "gmshell::audit",
            "warn target={} account={} by={} proc={} reason={}",
            target.name,
            target.account,
            ctx.source.actor_name(),
            proc,
            escape_log(reason)
        );
        if proc {
            let minutes = i64::from(ctx.policy.warn_mute_minutes);
            ctx.world.set_mute(
                target.account,
                MuteInfo {
                    until: Utc::now() + Duration::minutes(minutes),
                    reason: format!("{threshold} warnings accumulated"),
                    muted_by: ctx.source.actor_name(),
                },
            );
            ctx.reply(format!(
                "{} reached {} warnings and was muted for {} min",
                target.name, threshold, minutes
            ));
        } else {
            ctx.reply(format!("{} warned: {}", target.name, reason));
        }
        Ok(())
    })
}

fn pinfo<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let (name, _) = split_first(args);
        let target = ctx.player_target(name)?;
        let presence = if target.online { "online" } else { "offline" };
        let level = ctx
            .checker
            .security_level(target.account, target.online)
            .or_else(|| ctx.checker.security_level(target.account, false));
        let level = level.map(level_name).unwrap_or("unknown");
        ctx.reply(format!(
            "{} (guid {}) is {}; account {} [{}]",
            target.name, target.guid, presence, target.account, level
        ));
        if let Some(mute) = ctx.world.mute_state(target.account) {
            ctx.reply(format!(
                "Muted until {} by {}: {}",
                mute.until.format("%Y-%m-%d %H:%M UTC"),
                mute.muted_by,
                mute.reason
            ));
        }
        Ok(())
    })
}

fn revive<'a>(ctx: &'a mut CommandContext, args: &'a str) -> HandlerFuture<'a> {
    Box::pin(async move {
        let (name, _) = split_first(args);
        let target = ctx.player_target(name)?;
        ctx.ensure_authority_over(&target, false)?;
        if !target.online {
            return Err(CommandError::Failed(format!("{} is not online", target.name)));
        }
        if !ctx.world.revive_player(target.guid) {
            return Err(CommandError::Failed(format!(
                "{} does not need reviving",
                target.name
            )));
        }
        ctx.reply(format!("{} revived", target.name));
        Ok(())
    })
}
