//! # GM Command Core
//!
//! The administrative command layer: a registry of permission-gated commands,
//! the dispatcher that routes operator input through authorization to a
//! handler, and the security comparator that decides whether one actor may
//! act on another.
//!
//! ## Components
//!
//! - [`registry`] - Command descriptors and the build-once registry
//! - [`dispatch`] - Per-invocation routing and outcome reporting
//! - [`context`] - Actor contexts (session vs console) and handler plumbing
//! - [`security`] - Security levels, permissions, and the comparator
//! - [`commands`] - The built-in command set (thin calls into the world seam)
//!
//! ## Invocation flow
//!
//! ```text
//! raw line ─► tokenize ─► registry lookup ─► permission ─► context ─► handler
//!                 │              │                │            │         │
//!                 └─ first token is the name      └─ rejections render   └─ replies +
//!                    rest passes through verbatim    before any handler     outcome
//! ```
//!
//! The registry is constructed once at startup and only read afterwards, so
//! concurrent dispatch needs no locking. Handlers own their argument grammar;
//! the dispatcher never re-tokenizes the remainder.

pub mod commands;
pub mod context;
pub mod dispatch;
pub mod registry;
pub mod security;

use thiserror::Error;

use crate::link::LinkError;

/// Recoverable failure taxonomy for command handlers. The dispatcher maps
/// every value onto a per-invocation outcome; nothing here can take the
/// process down.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Malformed or absent argument; rendered as a usage/bad-argument reply.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Link-token parse failure; same class as [CommandError::BadArgument].
    #[error("bad argument: {0}")]
    Link(#[from] LinkError),

    /// The actor lacks authority over the target (security comparison lost).
    #[error("insufficient authority over target")]
    Unauthorized,

    /// Neither a live nor a persisted target could be resolved.
    #[error("target not found")]
    TargetNotFound,

    /// Command-specific precondition failed; carries the handler's message.
    #[error("{0}")]
    Failed(String),
}

/// Dispatch-time policy knobs, lifted from `[security]` in the config file.
#[derive(Debug, Clone, Copy)]
pub struct Policy {
    /// Render permission rejections with the unknown-command text so an
    /// unauthorized actor cannot probe for gated command names.
    pub conceal_denied: bool,
    /// Whether acting on your own account bypasses the level comparison
    /// (strict or not).
    pub self_action_allowed: bool,
    /// Warnings a target accumulates before the proc fires.
    pub warn_threshold: u32,
    /// Mute length applied when the warning threshold procs.
    pub warn_mute_minutes: u32,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            conceal_denied: true,
            self_action_allowed: true,
            warn_threshold: 3,
            warn_mute_minutes: 30,
        }
    }
}

impl From<&crate::config::SecurityConfig> for Policy {
    fn from(cfg: &crate::config::SecurityConfig) -> Self {
        Policy {
            conceal_denied: cfg.conceal_denied,
            self_action_allowed: cfg.self_action_allowed,
            warn_threshold: cfg.warn_threshold,
            warn_mute_minutes: cfg.warn_mute_minutes,
        }
    }
}
