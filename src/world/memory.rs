//! In-memory world backing the console binary and the integration tests.
//!
//! Holds player and account records, a small template catalog, and live
//! spawn tables behind one mutex - the single-writer discipline the command
//! core expects from its collaborators. Each account embeds a
//! [PropertyBag] for threshold bookkeeping such as warning counters.
//!
//! A world can be built empty and populated through the `add_*` methods, or
//! loaded from a [WorldSeed] (the JSON file `gmshell init` writes).

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{AccountId, EntitySummary, MuteInfo, OnlinePlayer, PersistedPlayer, World};
use crate::gm::security::{AccessProvider, Permission, SecurityLevel};
use crate::link::EntityRef;
use crate::props::PropertyBag;

/// Property key for the per-account warning counter.
const WARNING_COUNTER: &str = "warnings";

#[derive(Debug, Clone)]
struct PlayerRecord {
    guid: u64,
    account: AccountId,
    name: String,
    level: u32,
    online: bool,
    alive: bool,
    inventory: HashMap<u32, u32>,
    skills: HashMap<u32, (u32, u32)>,
    cooldowns: HashSet<u32>,
}

#[derive(Debug, Clone)]
struct AccountRecord {
    security: SecurityLevel,
    permissions: HashSet<Permission>,
    mute: Option<MuteInfo>,
    props: PropertyBag,
}

#[derive(Default)]
struct WorldState {
    players: HashMap<u64, PlayerRecord>,
    accounts: HashMap<AccountId, AccountRecord>,
    items: HashMap<u32, String>,
    spells: HashMap<u32, String>,
    skills: HashMap<u32, String>,
    item_sets: HashMap<u32, Vec<u32>>,
    creatures: HashMap<u64, String>,
    game_objects: HashMap<u64, String>,
}

/// Mutex-guarded world state implementing both collaborator seams.
#[derive(Default)]
pub struct InMemoryWorld {
    state: Mutex<WorldState>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: &WorldSeed) -> Self {
        let world = Self::new();
        for account in &seed.accounts {
            let perms: Vec<Permission> = if account.all_permissions {
                Permission::ALL.to_vec()
            } else {
                account.permissions.clone()
            };
            world.add_account(AccountId(account.id), account.security, &perms);
        }
        for player in &seed.players {
            world.add_player(
                player.guid,
                AccountId(player.account),
                &player.name,
                player.level,
                player.online,
            );
        }
        for item in &seed.items {
            world.add_item_template(item.id, &item.name);
        }
        for spell in &seed.spells {
            world.add_spell(spell.id, &spell.name);
        }
        for skill in &seed.skills {
            world.add_skill(skill.id, &skill.name);
        }
        for set in &seed.item_sets {
            world.add_item_set(set.id, set.items.clone());
        }
        for spawn in &seed.creatures {
            world.add_creature(spawn.guid, &spawn.name);
        }
        for spawn in &seed.game_objects {
            world.add_game_object(spawn.guid, &spawn.name);
        }
        world
    }

    pub fn demo() -> Self {
        Self::from_seed(&WorldSeed::demo())
    }

    fn state(&self) -> MutexGuard<'_, WorldState> {
        // A poisoned lock means a panic mid-mutation; the remaining state is
        // still the best this in-memory world has.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_account(&self, id: AccountId, security: SecurityLevel, permissions: &[Permission]) {
        self.state().accounts.insert(
            id,
            AccountRecord {
                security,
                permissions: permissions.iter().copied().collect(),
                mute: None,
                props: PropertyBag::new(),
            },
        );
    }

    pub fn add_player(&self, guid: u64, account: AccountId, name: &str, level: u32, online: bool) {
        self.state().players.insert(
            guid,
            PlayerRecord {
                guid,
                account,
                name: name.to_string(),
                level,
                online,
                alive: true,
                inventory: HashMap::new(),
                skills: HashMap::new(),
                cooldowns: HashSet::new(),
            },
        );
    }

    pub fn add_item_template(&self, id: u32, name: &str) {
        self.state().items.insert(id, name.to_string());
    }

    pub fn add_spell(&self, id: u32, name: &str) {
        self.state().spells.insert(id, name.to_string());
    }

    pub fn add_skill(&self, id: u32, name: &str) {
        self.state().skills.insert(id, name.to_string());
    }

    pub fn add_item_set(&self, id: u32, items: Vec<u32>) {
        self.state().item_sets.insert(id, items);
    }

    pub fn add_creature(&self, guid: u64, name: &str) {
        self.state().creatures.insert(guid, name.to_string());
    }

    pub fn add_game_object(&self, guid: u64, name: &str) {
        self.state().game_objects.insert(guid, name.to_string());
    }

    /// Teach a player a skill so `set_skill` has something to update.
    pub fn learn_skill(&self, guid: u64, skill: u32, value: u32, max: u32) {
        if let Some(player) = self.state().players.get_mut(&guid) {
            player.skills.insert(skill, (value, max));
        }
    }

    pub fn set_cooldown(&self, guid: u64, spell: u32) {
        if let Some(player) = self.state().players.get_mut(&guid) {
            player.cooldowns.insert(spell);
        }
    }

    pub fn kill_player(&self, guid: u64) {
        if let Some(player) = self.state().players.get_mut(&guid) {
            player.alive = false;
        }
    }

    // Observation helpers for tests and the console binary.

    pub fn is_online(&self, name: &str) -> bool {
        self.state()
            .players
            .values()
            .any(|p| p.online && p.name.eq_ignore_ascii_case(name))
    }

    pub fn is_alive(&self, guid: u64) -> bool {
        self.state().players.get(&guid).map(|p| p.alive).unwrap_or(false)
    }

    pub fn item_count(&self, guid: u64, item: u32) -> u32 {
        self.state()
            .players
            .get(&guid)
            .and_then(|p| p.inventory.get(&item).copied())
            .unwrap_or(0)
    }

    pub fn skill_of(&self, guid: u64, skill: u32) -> Option<(u32, u32)> {
        self.state()
            .players
            .get(&guid)
            .and_then(|p| p.skills.get(&skill).copied())
    }

    pub fn cooldown_count(&self, guid: u64) -> usize {
        self.state()
            .players
            .get(&guid)
            .map(|p| p.cooldowns.len())
            .unwrap_or(0)
    }

    pub fn warning_count(&self, account: AccountId) -> u32 {
        self.state()
            .accounts
            .get(&account)
            .map(|a| a.props.get::<u32>(WARNING_COUNTER, 0))
            .unwrap_or(0)
    }
}

fn player_summary(player: &PlayerRecord) -> EntitySummary {
    EntitySummary {
        kind: "player",
        id: player.guid,
        name: player.name.clone(),
    }
}

impl World for InMemoryWorld {
    fn find_online_player(&self, name: &str) -> Option<OnlinePlayer> {
        self.state()
            .players
            .values()
            .find(|p| p.online && p.name.eq_ignore_ascii_case(name))
            .map(|p| OnlinePlayer {
                guid: p.guid,
                account: p.account,
                name: p.name.clone(),
                level: p.level,
            })
    }

    fn find_persisted_player(&self, name: &str) -> Option<PersistedPlayer> {
        self.state()
            .players
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| PersistedPlayer {
                guid: p.guid,
                account: p.account,
                name: p.name.clone(),
                level: p.level,
            })
    }

    fn online_player(&self, guid: u64) -> Option<OnlinePlayer> {
        self.state()
            .players
            .get(&guid)
            .filter(|p| p.online)
            .map(|p| OnlinePlayer {
                guid: p.guid,
                account: p.account,
                name: p.name.clone(),
                level: p.level,
            })
    }

    fn resolve_live(&self, entity: &EntityRef) -> Option<EntitySummary> {
        let state = self.state();
        match entity {
            EntityRef::Player(guid) => state
                .players
                .get(guid)
                .filter(|p| p.online)
                .map(player_summary),
            EntityRef::Creature(guid) => state.creatures.get(guid).map(|name| EntitySummary {
                kind: "creature",
                id: *guid,
                name: name.clone(),
            }),
            EntityRef::GameObject(guid) => {
                state.game_objects.get(guid).map(|name| EntitySummary {
                    kind: "game object",
                    id: *guid,
                    name: name.clone(),
                })
            }
            // Templates are definitions, not live entities.
            _ => None,
        }
    }

    fn resolve_persisted(&self, entity: &EntityRef) -> Option<EntitySummary> {
        let state = self.state();
        let template = |kind: &'static str, id: u32, table: &HashMap<u32, String>| {
            table.get(&id).map(|name| EntitySummary {
                kind,
                id: u64::from(id),
                name: name.clone(),
            })
        };
        match entity {
            EntityRef::Player(guid) => state.players.get(guid).map(player_summary),
            EntityRef::Item(id) => template("item", *id, &state.items),
            EntityRef::Spell(id) => template("spell", *id, &state.spells),
            EntityRef::Skill(id) => template("skill", *id, &state.skills),
            EntityRef::ItemSet(id) => state.item_sets.get(id).map(|items| EntitySummary {
                kind: "item set",
                id: u64::from(*id),
                name: format!("{} items", items.len()),
            }),
            EntityRef::Creature(_) | EntityRef::GameObject(_) => None,
        }
    }

    fn kick_player(&self, guid: u64, _reason: &str) -> bool {
        match self.state().players.get_mut(&guid) {
            Some(player) if player.online => {
                player.online = false;
                true
            }
            _ => false,
        }
    }

    fn revive_player(&self, guid: u64) -> bool {
        match self.state().players.get_mut(&guid) {
            Some(player) if player.online && !player.alive => {
                player.alive = true;
                true
            }
            _ => false,
        }
    }

    fn set_mute(&self, account: AccountId, mute: MuteInfo) -> bool {
        match self.state().accounts.get_mut(&account) {
            Some(record) => {
                record.mute = Some(mute);
                true
            }
            None => false,
        }
    }

    fn clear_mute(&self, account: AccountId) -> bool {
        self.state()
            .accounts
            .get_mut(&account)
            .map(|record| record.mute.take().is_some())
            .unwrap_or(false)
    }

    fn mute_state(&self, account: AccountId) -> Option<MuteInfo> {
        self.state()
            .accounts
            .get(&account)
            .and_then(|record| record.mute.clone())
    }

    fn record_warning(&self, account: AccountId, threshold: u32) -> Option<bool> {
        self.state()
            .accounts
            .get_mut(&account)
            .map(|record| record.props.increment_or_proc(WARNING_COUNTER, threshold, 1))
    }

    fn give_item(&self, guid: u64, item: u32, count: u32) -> bool {
        match self.state().players.get_mut(&guid) {
            Some(player) if player.online => {
                *player.inventory.entry(item).or_insert(0) += count;
                true
            }
            _ => false,
        }
    }

    fn set_skill(&self, guid: u64, skill: u32, value: u32, max: u32) -> bool {
        match self.state().players.get_mut(&guid) {
            Some(player) if player.online && player.skills.contains_key(&skill) => {
                player.skills.insert(skill, (value, max));
                true
            }
            _ => false,
        }
    }

    fn clear_cooldown(&self, guid: u64, spell: Option<u32>) -> bool {
        match self.state().players.get_mut(&guid) {
            Some(player) if player.online => {
                match spell {
                    Some(id) => {
                        player.cooldowns.remove(&id);
                    }
                    None => player.cooldowns.clear(),
                }
                true
            }
            _ => false,
        }
    }

    fn item_exists(&self, item: u32) -> bool {
        self.state().items.contains_key(&item)
    }

    fn spell_exists(&self, spell: u32) -> bool {
        self.state().spells.contains_key(&spell)
    }

    fn skill_exists(&self, skill: u32) -> bool {
        self.state().skills.contains_key(&skill)
    }

    fn item_set_items(&self, set: u32) -> Vec<u32> {
        self.state()
            .item_sets
            .get(&set)
            .cloned()
            .unwrap_or_default()
    }
}

impl AccessProvider for InMemoryWorld {
    fn permissions(&self, account: AccountId) -> HashSet<Permission> {
        self.state()
            .accounts
            .get(&account)
            .map(|record| record.permissions.clone())
            .unwrap_or_default()
    }

    fn security_level(&self, account: AccountId, online: bool) -> Option<SecurityLevel> {
        let state = self.state();
        let record = state.accounts.get(&account)?;
        if online
            && !state
                .players
                .values()
                .any(|p| p.account == account && p.online)
        {
            // Live lookup with no live session behind it fails closed; the
            // caller falls back to the persisted path explicitly.
            return None;
        }
        Some(record.security)
    }
}

/// Serializable world snapshot for `gmshell init` and custom demo setups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSeed {
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
    #[serde(default)]
    pub players: Vec<PlayerSeed>,
    #[serde(default)]
    pub items: Vec<TemplateSeed>,
    #[serde(default)]
    pub spells: Vec<TemplateSeed>,
    #[serde(default)]
    pub skills: Vec<TemplateSeed>,
    #[serde(default)]
    pub item_sets: Vec<ItemSetSeed>,
    #[serde(default)]
    pub creatures: Vec<SpawnSeed>,
    #[serde(default)]
    pub game_objects: Vec<SpawnSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSeed {
    pub id: u32,
    pub security: SecurityLevel,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Grant the full permission table; overrides `permissions`.
    #[serde(default)]
    pub all_permissions: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSeed {
    pub guid: u64,
    pub account: u32,
    pub name: String,
    #[serde(default = "default_player_level")]
    pub level: u32,
    #[serde(default)]
    pub online: bool,
}

fn default_player_level() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSeed {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSetSeed {
    pub id: u32,
    pub items: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSeed {
    pub guid: u64,
    pub name: String,
}

impl WorldSeed {
    /// Small fixed cast for the interactive console: one of each privilege
    /// tier, an offline player, and a handful of templates and spawns.
    pub fn demo() -> Self {
        WorldSeed {
            accounts: vec![
                AccountSeed {
                    id: 1,
                    security: SecurityLevel::Administrator,
                    permissions: Vec::new(),
                    all_permissions: true,
                },
                AccountSeed {
                    id: 2,
                    security: SecurityLevel::GameMaster,
                    permissions: Vec::new(),
                    all_permissions: true,
                },
                AccountSeed {
                    id: 3,
                    security: SecurityLevel::Moderator,
                    permissions: vec![
                        Permission::Commands,
                        Permission::Help,
                        Permission::Kick,
                        Permission::Warn,
                        Permission::PlayerInfo,
                    ],
                    all_permissions: false,
                },
                AccountSeed {
                    id: 4,
                    security: SecurityLevel::Player,
                    permissions: vec![Permission::Commands, Permission::Help],
                    all_permissions: false,
                },
                AccountSeed {
                    id: 5,
                    security: SecurityLevel::Player,
                    permissions: Vec::new(),
                    all_permissions: false,
                },
            ],
            players: vec![
                PlayerSeed {
                    guid: 100,
                    account: 2,
                    name: "Astra".into(),
                    level: 60,
                    online: true,
                },
                PlayerSeed {
                    guid: 200,
                    account: 3,
                    name: "Borin".into(),
                    level: 48,
                    online: true,
                },
                PlayerSeed {
                    guid: 300,
                    account: 4,
                    name: "Cyra".into(),
                    level: 31,
                    online: true,
                },
                PlayerSeed {
                    guid: 400,
                    account: 5,
                    name: "Dorn".into(),
                    level: 12,
                    online: false,
                },
            ],
            items: vec![
                TemplateSeed {
                    id: 17,
                    name: "Worn Shortsword".into(),
                },
                TemplateSeed {
                    id: 117,
                    name: "Tough Jerky".into(),
                },
                TemplateSeed {
                    id: 2589,
                    name: "Linen Cloth".into(),
                },
            ],
            spells: vec![
                TemplateSeed {
                    id: 8326,
                    name: "Ghost".into(),
                },
                TemplateSeed {
                    id: 1784,
                    name: "Stealth".into(),
                },
            ],
            skills: vec![
                TemplateSeed {
                    id: 186,
                    name: "Mining".into(),
                },
                TemplateSeed {
                    id: 356,
                    name: "Fishing".into(),
                },
            ],
            item_sets: vec![ItemSetSeed {
                id: 1,
                items: vec![17, 117],
            }],
            creatures: vec![SpawnSeed {
                guid: 9001,
                name: "Plains Rat".into(),
            }],
            game_objects: vec![SpawnSeed {
                guid: 7,
                name: "Battered Chest".into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn warning_counter_procs_and_resets() {
        let world = InMemoryWorld::new();
        let account = AccountId(9);
        world.add_account(account, SecurityLevel::Player, &[]);
        assert_eq!(world.record_warning(account, 3), Some(false));
        assert_eq!(world.record_warning(account, 3), Some(false));
        assert_eq!(world.warning_count(account), 2);
        assert_eq!(world.record_warning(account, 3), Some(true));
        assert_eq!(world.warning_count(account), 0);
        assert_eq!(world.record_warning(AccountId(404), 3), None);
    }

    #[test]
    fn mute_roundtrip() {
        let world = InMemoryWorld::new();
        let account = AccountId(9);
        world.add_account(account, SecurityLevel::Player, &[]);
        assert!(world.mute_state(account).is_none());
        assert!(world.set_mute(
            account,
            MuteInfo {
                until: Utc::now() + Duration::minutes(10),
                reason: "spam".into(),
                muted_by: "Astra".into(),
            }
        ));
        assert_eq!(world.mute_state(account).map(|m| m.reason), Some("spam".into()));
        assert!(world.clear_mute(account));
        assert!(!world.clear_mute(account));
    }

    #[test]
    fn live_and_persisted_resolution_differ_for_offline_players() {
        let world = InMemoryWorld::demo();
        let offline = EntityRef::Player(400);
        assert!(world.resolve_live(&offline).is_none());
        assert_eq!(
            world.resolve_persisted(&offline).map(|s| s.name),
            Some("Dorn".into())
        );
    }

    #[test]
    fn online_security_lookup_fails_closed_for_offline_accounts() {
        let world = InMemoryWorld::demo();
        // Account 5's only player (Dorn) is offline.
        assert_eq!(world.security_level(AccountId(5), true), None);
        assert_eq!(
            world.security_level(AccountId(5), false),
            Some(SecurityLevel::Player)
        );
    }

    #[test]
    fn seed_json_roundtrip() {
        let seed = WorldSeed::demo();
        let json = serde_json::to_string(&seed).expect("serialize seed");
        let parsed: WorldSeed = serde_json::from_str(&json).expect("parse seed");
        assert_eq!(parsed.players.len(), seed.players.len());
        assert_eq!(parsed.accounts.len(), seed.accounts.len());
    }
}
