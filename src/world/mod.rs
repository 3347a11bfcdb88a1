//! Collaborator seams to the simulation this core does not own.
//!
//! Command bodies are thin: they parse arguments, run the security
//! comparison, and then call through the [World] trait. The trait is the
//! narrow query/mutate surface the built-in commands need - the real game
//! server implements it over its object accessors and character store;
//! [memory::InMemoryWorld] implements it for the interactive console binary
//! and the integration tests.

pub mod memory;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::link::EntityRef;

/// Account identifier, the unit security levels and mutes attach to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A player currently in the world.
#[derive(Debug, Clone)]
pub struct OnlinePlayer {
    pub guid: u64,
    pub account: AccountId,
    pub name: String,
    pub level: u32,
}

/// Summary of a player known only from persisted records.
#[derive(Debug, Clone)]
pub struct PersistedPlayer {
    pub guid: u64,
    pub account: AccountId,
    pub name: String,
    pub level: u32,
}

/// What an [EntityRef] resolved to, for display.
#[derive(Debug, Clone)]
pub struct EntitySummary {
    pub kind: &'static str,
    pub id: u64,
    pub name: String,
}

/// An active chat restriction on an account.
#[derive(Debug, Clone)]
pub struct MuteInfo {
    pub until: DateTime<Utc>,
    pub reason: String,
    pub muted_by: String,
}

/// The simulation surface the command core calls. Implementations own their
/// concurrency discipline; every method here is a complete operation.
pub trait World: Send + Sync {
    fn find_online_player(&self, name: &str) -> Option<OnlinePlayer>;
    fn find_persisted_player(&self, name: &str) -> Option<PersistedPlayer>;
    fn online_player(&self, guid: u64) -> Option<OnlinePlayer>;

    /// Resolve a reference against the live world.
    fn resolve_live(&self, entity: &EntityRef) -> Option<EntitySummary>;
    /// Resolve a reference against persisted records and templates.
    fn resolve_persisted(&self, entity: &EntityRef) -> Option<EntitySummary>;

    /// Disconnect an online player. False if the guid is not online.
    fn kick_player(&self, guid: u64, reason: &str) -> bool;
    /// Bring a dead online player back. False if offline or already alive.
    fn revive_player(&self, guid: u64) -> bool;
    /// Apply a chat restriction to an account (online or not; offline
    /// accounts see it at next login). False if the account is unknown.
    fn set_mute(&self, account: AccountId, mute: MuteInfo) -> bool;
    /// Lift an account's chat restriction. False if none was active.
    fn clear_mute(&self, account: AccountId) -> bool;
    fn mute_state(&self, account: AccountId) -> Option<MuteInfo>;
    /// Count a warning against an account; `Some(true)` when the threshold
    /// procs (the counter resets). `None` if the account is unknown.
    fn record_warning(&self, account: AccountId, threshold: u32) -> Option<bool>;

    /// Grant items to an online player. False if offline or unknown guid.
    fn give_item(&self, guid: u64, item: u32, count: u32) -> bool;
    /// Set a known skill's value/max. False if the player does not have the
    /// skill (or is not online).
    fn set_skill(&self, guid: u64, skill: u32, value: u32, max: u32) -> bool;
    /// Clear one spell cooldown, or all of them. False if the guid is not
    /// online.
    fn clear_cooldown(&self, guid: u64, spell: Option<u32>) -> bool;

    fn item_exists(&self, item: u32) -> bool;
    fn spell_exists(&self, spell: u32) -> bool;
    fn skill_exists(&self, skill: u32) -> bool;
    /// Item ids granted by an item set; empty for unknown sets.
    fn item_set_items(&self, set: u32) -> Vec<u32>;
}
