//! Security levels, command permissions, and the actor-vs-target comparator.
//!
//! Levels are ordered lowest to highest privilege. [SecurityLevel::Console]
//! is synthetic: it never belongs to an account and always compares above
//! every account level, so console-originated invocations pass every check.
//!
//! The comparator itself never logs and never errors - it hands back a
//! [SecurityVerdict] and leaves rendering to the caller.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::context::CommandSource;
use crate::world::AccountId;

/// Account privilege tiers, lowest to highest. `Console` must stay last:
/// accounts are never assigned it, and the ordering derives from declaration
/// order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Player,
    Moderator,
    GameMaster,
    Administrator,
    Console,
}

/// Human-readable name for a level, for pinfo output and audit lines.
pub fn level_name(level: SecurityLevel) -> &'static str {
    match level {
        SecurityLevel::Player => "Player",
        SecurityLevel::Moderator => "Moderator",
        SecurityLevel::GameMaster => "Game Master",
        SecurityLevel::Administrator => "Administrator",
        SecurityLevel::Console => "Console",
    }
}

/// Per-command permission ids. Possession is checked against the invoking
/// account's grant set; the console possesses all of them implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Commands,
    Help,
    Kick,
    Mute,
    Unmute,
    Warn,
    PlayerInfo,
    Revive,
    AddItem,
    AddItemSet,
    SetSkill,
    Cooldown,
    Guid,
}

impl Permission {
    /// Every permission, for full-grant accounts in seeds and fixtures.
    pub const ALL: &'static [Permission] = &[
        Permission::Commands,
        Permission::Help,
        Permission::Kick,
        Permission::Mute,
        Permission::Unmute,
        Permission::Warn,
        Permission::PlayerInfo,
        Permission::Revive,
        Permission::AddItem,
        Permission::AddItemSet,
        Permission::SetSkill,
        Permission::Cooldown,
        Permission::Guid,
    ];
}

/// Collaborator seam to whatever owns account grants and security levels.
/// The `online` flag selects the live lookup or the persisted (out-of-band)
/// one; `None` from either means the account could not be resolved there.
pub trait AccessProvider: Send + Sync {
    fn permissions(&self, account: AccountId) -> HashSet<Permission>;
    fn security_level(&self, account: AccountId, online: bool) -> Option<SecurityLevel>;
}

/// Outcome of an actor-vs-target comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityVerdict {
    Allowed,
    Denied,
    /// The target's persisted security level could not be resolved. Never
    /// treated as a grant.
    TargetNotFound,
}

/// Decides permission possession and actor-vs-target authority.
#[derive(Clone)]
pub struct SecurityChecker {
    access: Arc<dyn AccessProvider>,
    self_action_allowed: bool,
}

impl SecurityChecker {
    pub fn new(access: Arc<dyn AccessProvider>, self_action_allowed: bool) -> Self {
        SecurityChecker {
            access,
            self_action_allowed,
        }
    }

    /// Does the actor hold `permission`? Console contexts hold everything.
    pub fn has_permission(&self, source: &CommandSource, permission: Permission) -> bool {
        match source {
            CommandSource::Console => true,
            CommandSource::Session(session) => {
                self.access.permissions(session.account).contains(&permission)
            }
        }
    }

    /// Compare the actor against a target account.
    ///
    /// Non-strict: the actor's level must be at least the target's. Strict
    /// (punitive account actions): the actor's level must exceed the
    /// target's - equal peers cannot act on each other. Acting on your own
    /// account short-circuits under the configured self-action policy.
    pub fn can_act_on(
        &self,
        source: &CommandSource,
        target: AccountId,
        target_online: bool,
        strict: bool,
    ) -> SecurityVerdict {
        let actor = match source {
            CommandSource::Console => return SecurityVerdict::Allowed,
            CommandSource::Session(session) => session,
        };

        if actor.account == target {
            return if self.self_action_allowed {
                SecurityVerdict::Allowed
            } else {
                SecurityVerdict::Denied
            };
        }

        let target_level = match self.access.security_level(target, target_online) {
            Some(level) => level,
            None => return SecurityVerdict::TargetNotFound,
        };

        let allowed = if strict {
            actor.security > target_level
        } else {
            actor.security >= target_level
        };
        if allowed {
            SecurityVerdict::Allowed
        } else {
            SecurityVerdict::Denied
        }
    }

    /// Provider passthrough for callers that render level names (pinfo).
    pub fn security_level(&self, account: AccountId, online: bool) -> Option<SecurityLevel> {
        self.access.security_level(account, online)
    }
}
