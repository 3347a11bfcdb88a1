//! Per-invocation command routing.
//!
//! One call to [Dispatcher::dispatch] takes a raw line and an actor context
//! through tokenize → lookup → permission check → context check → handler,
//! and reports exactly one [DispatchOutcome]. Rejections are decided before
//! any handler runs, and a handler's own failure is confined to that
//! invocation's result - the dispatcher holds no cross-invocation state
//! beyond the immutable registry.

use std::sync::Arc;

use log::{debug, info};

use super::context::{CommandContext, CommandSource};
use super::registry::CommandRegistry;
use super::security::{AccessProvider, SecurityChecker};
use super::{CommandError, Policy};
use crate::logutil::escape_log;
use crate::world::World;

/// Unknown-command text, also used for concealed permission rejections so
/// gated command names cannot be probed.
const UNKNOWN_COMMAND: &str = "There is no such command.";
const PERMISSION_DENIED: &str = "Permission denied.";
const CONSOLE_NOT_ALLOWED: &str = "This command cannot be used from the console.";

/// Terminal state of one invocation. Exactly one per dispatch; no
/// partial/multi-status results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success,
    UnknownCommand,
    PermissionDenied,
    ContextNotAllowed,
    HandlerFailed,
}

/// Outcome plus the reply lines produced for the invoker.
#[derive(Debug)]
pub struct DispatchResult {
    pub outcome: DispatchOutcome,
    pub replies: Vec<String>,
}

impl DispatchResult {
    pub fn succeeded(&self) -> bool {
        self.outcome == DispatchOutcome::Success
    }

    fn rejected(outcome: DispatchOutcome, reply: &str) -> Self {
        DispatchResult {
            outcome,
            replies: vec![reply.to_string()],
        }
    }
}

/// Routes lines against a registry built at startup. Cheap to share; all
/// fields are read-only after construction.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    world: Arc<dyn World>,
    checker: SecurityChecker,
    policy: Policy,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        world: Arc<dyn World>,
        access: Arc<dyn AccessProvider>,
        policy: Policy,
    ) -> Self {
        Dispatcher {
            registry,
            world,
            checker: SecurityChecker::new(access, policy.self_action_allowed),
            policy,
        }
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Run one invocation to completion and report its outcome.
    ///
    /// The first whitespace-delimited token is the command name; the
    /// remainder is handed to the handler verbatim. Empty input is an
    /// unknown command with no reply.
    pub async fn dispatch(&self, source: CommandSource, line: &str) -> DispatchResult {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return DispatchResult {
                outcome: DispatchOutcome::UnknownCommand,
                replies: Vec::new(),
            };
        }

        let (name, rest) = match trimmed.split_once(|c: char| c.is_whitespace()) {
            Some((name, rest)) => (name, rest),
            None => (trimmed, ""),
        };
        debug!(
            "dispatch from {}: {}",
            source.describe(),
            escape_log(trimmed)
        );

        let descriptor = match self.registry.get(name) {
            Some(d) => d,
            None => {
                return self.audited(
                    name,
                    &source,
                    DispatchResult::rejected(DispatchOutcome::UnknownCommand, UNKNOWN_COMMAND),
                )
            }
        };

        if !self.checker.has_permission(&source, descriptor.permission) {
            let reply = if self.policy.conceal_denied {
                UNKNOWN_COMMAND
            } else {
                PERMISSION_DENIED
            };
            return self.audited(
                name,
                &source,
                DispatchResult::rejected(DispatchOutcome::PermissionDenied, reply),
            );
        }

        if !descriptor.console_allowed && source.is_console() {
            return self.audited(
                name,
                &source,
                DispatchResult::rejected(DispatchOutcome::ContextNotAllowed, CONSOLE_NOT_ALLOWED),
            );
        }

        let handler = descriptor.handler;
        let mut ctx = CommandContext::new(
            source,
            Arc::clone(&self.world),
            self.checker.clone(),
            Arc::clone(&self.registry),
            self.policy,
        );
        let outcome = match handler(&mut ctx, rest).await {
            Ok(()) => DispatchOutcome::Success,
            Err(err) => {
                ctx.reply(render_error(&err));
                DispatchOutcome::HandlerFailed
            }
        };
        let source = ctx.source.clone();
        self.audited(
            name,
            &source,
            DispatchResult {
                outcome,
                replies: ctx.into_replies(),
            },
        )
    }

    fn audited(
        &self,
        name: &str,
        source: &CommandSource,
        result: DispatchResult,
    ) -> DispatchResult {
        info!(
            target: "gmshell::audit",
            "cmd={} source={} outcome={:?}",
            escape_log(name),
            source.describe(),
            result.outcome
        );
        result
    }
}

/// User-facing rendering of the handler error taxonomy.
fn render_error(err: &CommandError) -> String {
    match err {
        CommandError::BadArgument(msg) => format!("Bad argument: {msg}."),
        CommandError::Link(e) => format!("Bad argument: {e}."),
        CommandError::Unauthorized => "You do not have authority over that target.".to_string(),
        CommandError::TargetNotFound => "Target not found.".to_string(),
        CommandError::Failed(msg) => {
            let mut line = msg.clone();
            if !line.ends_with('.') {
                line.push('.');
            }
            line
        }
    }
}
