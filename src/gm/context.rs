//! Actor contexts and the per-invocation handler environment.
//!
//! A [CommandSource] is who typed the line: an interactive session bound to a
//! logged-in character, or the non-interactive server console. The
//! [CommandContext] wraps the source together with the collaborator seams a
//! handler may touch and collects the handler's reply lines; the dispatcher
//! builds one per invocation and discards it afterwards.

use std::sync::Arc;

use super::registry::CommandRegistry;
use super::security::{SecurityChecker, SecurityLevel, SecurityVerdict};
use super::{CommandError, Policy};
use crate::link::EntityRef;
use crate::world::{AccountId, World};

/// The identity and privilege of a logged-in operator.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub account: AccountId,
    /// The operator's own character name.
    pub character: String,
    /// The operator's own character guid (low part).
    pub guid: u64,
    pub security: SecurityLevel,
    /// Current in-world selection, if the client reported one.
    pub selected: Option<EntityRef>,
}

/// Who issued the command line.
#[derive(Debug, Clone)]
pub enum CommandSource {
    /// Non-interactive server console. Passes every permission and security
    /// comparison.
    Console,
    Session(SessionInfo),
}

impl CommandSource {
    pub fn is_console(&self) -> bool {
        matches!(self, CommandSource::Console)
    }

    /// Effective security level for comparisons.
    pub fn security(&self) -> SecurityLevel {
        match self {
            CommandSource::Console => SecurityLevel::Console,
            CommandSource::Session(s) => s.security,
        }
    }

    /// Short form for audit lines.
    pub fn describe(&self) -> String {
        match self {
            CommandSource::Console => "console".to_string(),
            CommandSource::Session(s) => format!("{} (account {})", s.character, s.account),
        }
    }

    /// Name used when attributing an action to this actor (mute reasons,
    /// audit fields).
    pub fn actor_name(&self) -> String {
        match self {
            CommandSource::Console => "console".to_string(),
            CommandSource::Session(s) => s.character.clone(),
        }
    }
}

/// A player a command is aimed at, resolved live or from persisted records.
#[derive(Debug, Clone)]
pub struct PlayerTarget {
    pub guid: u64,
    pub account: AccountId,
    pub name: String,
    pub online: bool,
}

/// Everything a handler gets to work with for one invocation.
pub struct CommandContext {
    pub source: CommandSource,
    pub world: Arc<dyn World>,
    pub checker: SecurityChecker,
    pub registry: Arc<CommandRegistry>,
    pub policy: Policy,
    replies: Vec<String>,
}

impl CommandContext {
    pub fn new(
        source: CommandSource,
        world: Arc<dyn World>,
        checker: SecurityChecker,
        registry: Arc<CommandRegistry>,
        policy: Policy,
    ) -> Self {
        CommandContext {
            source,
            world,
            checker,
            registry,
            policy,
            replies: Vec::new(),
        }
    }

    /// Queue a reply line for the invoker.
    pub fn reply(&mut self, line: impl Into<String>) {
        self.replies.push(line.into());
    }

    pub fn into_replies(self) -> Vec<String> {
        self.replies
    }

    /// The session behind this invocation, for commands that act on the
    /// operator's own character. The dispatcher's context check keeps
    /// console input away from such commands; this is the handler-side seam
    /// for reaching the session data.
    pub fn require_session(&self) -> Result<&SessionInfo, CommandError> {
        match &self.source {
            CommandSource::Session(s) => Ok(s),
            CommandSource::Console => Err(CommandError::Failed(
                "this command requires an interactive session".into(),
            )),
        }
    }

    /// Resolve a player target from an optional name token.
    ///
    /// With a name: online lookup first, then the persisted records. Without
    /// one: the session's selected player if any, else the operator's own
    /// character; console invocations must always name the target.
    pub fn player_target(&self, token: Option<&str>) -> Result<PlayerTarget, CommandError> {
        if let Some(name) = token {
            let name = name.trim();
            if name.is_empty() {
                return Err(CommandError::BadArgument("player name required".into()));
            }
            if let Some(p) = self.world.find_online_player(name) {
                return Ok(PlayerTarget {
                    guid: p.guid,
                    account: p.account,
                    name: p.name,
                    online: true,
                });
            }
            if let Some(p) = self.world.find_persisted_player(name) {
                return Ok(PlayerTarget {
                    guid: p.guid,
                    account: p.account,
                    name: p.name,
                    online: false,
                });
            }
            return Err(CommandError::TargetNotFound);
        }

        let session = match &self.source {
            CommandSource::Session(s) => s,
            CommandSource::Console => {
                return Err(CommandError::BadArgument("player name required".into()))
            }
        };
        if let Some(EntityRef::Player(guid)) = session.selected {
            if let Some(p) = self.world.online_player(guid) {
                return Ok(PlayerTarget {
                    guid: p.guid,
                    account: p.account,
                    name: p.name,
                    online: true,
                });
            }
        }
        Ok(PlayerTarget {
            guid: session.guid,
            account: session.account,
            name: session.character.clone(),
            online: true,
        })
    }

    /// Run the security comparison against `target` and translate the
    /// verdict into the handler error taxonomy.
    pub fn ensure_authority_over(
        &self,
        target: &PlayerTarget,
        strict: bool,
    ) -> Result<(), CommandError> {
        match self
            .checker
            .can_act_on(&self.source, target.account, target.online, strict)
        {
            SecurityVerdict::Allowed => Ok(()),
            SecurityVerdict::Denied => Err(CommandError::Unauthorized),
            SecurityVerdict::TargetNotFound => Err(CommandError::TargetNotFound),
        }
    }
}
