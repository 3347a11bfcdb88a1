//! Test utilities & fixtures.
//!
//! Builds a dispatcher over a populated in-memory world with a standard cast:
//! a game-master actor, a game-master peer, a moderator, two plain players
//! (one offline), and a handful of templates and spawns.

#![allow(dead_code)]

use std::sync::Arc;

use gmshell::gm::commands::register_builtins;
use gmshell::gm::context::{CommandSource, SessionInfo};
use gmshell::gm::security::{Permission, SecurityLevel};
use gmshell::gm::Policy;
use gmshell::world::memory::InMemoryWorld;
use gmshell::world::AccountId;
use gmshell::{CommandRegistry, Dispatcher};

pub struct Harness {
    pub world: Arc<InMemoryWorld>,
    pub dispatcher: Dispatcher,
}

pub fn harness() -> Harness {
    harness_with(Policy::default())
}

pub fn harness_with(policy: Policy) -> Harness {
    let world = Arc::new(InMemoryWorld::new());
    populate(&world);
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry).expect("register built-ins");
    let dispatcher = Dispatcher::new(Arc::new(registry), world.clone(), world.clone(), policy);
    Harness { world, dispatcher }
}

fn populate(world: &InMemoryWorld) {
    world.add_account(AccountId(10), SecurityLevel::GameMaster, Permission::ALL);
    world.add_account(AccountId(20), SecurityLevel::GameMaster, Permission::ALL);
    world.add_account(
        AccountId(30),
        SecurityLevel::Moderator,
        &[Permission::Commands, Permission::Help, Permission::Kick],
    );
    world.add_account(AccountId(40), SecurityLevel::Player, &[]);
    world.add_account(AccountId(50), SecurityLevel::Player, &[]);

    world.add_player(100, AccountId(10), "Astra", 60, true);
    world.add_player(200, AccountId(20), "Brann", 58, true);
    world.add_player(300, AccountId(30), "Cyra", 44, true);
    world.add_player(400, AccountId(40), "Dorn", 12, true);
    world.add_player(500, AccountId(50), "Eira", 9, false);

    world.add_item_template(17, "Worn Shortsword");
    world.add_item_template(117, "Tough Jerky");
    world.add_item_set(1, vec![17, 117]);
    world.add_skill(186, "Mining");
    world.add_spell(8326, "Ghost");
    world.add_creature(9001, "Plains Rat");
    world.add_game_object(7, "Battered Chest");
}

/// The standard game-master actor (account 10, character Astra).
pub fn gm_session() -> CommandSource {
    session(10, "Astra", 100, SecurityLevel::GameMaster)
}

pub fn session(account: u32, character: &str, guid: u64, security: SecurityLevel) -> CommandSource {
    CommandSource::Session(SessionInfo {
        account: AccountId(account),
        character: character.to_string(),
        guid,
        security,
        selected: None,
    })
}
