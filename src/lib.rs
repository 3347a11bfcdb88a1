//! # gmshell - Administrative Command Core for Game Servers
//!
//! gmshell is the text-command layer that sits between "operator typed a
//! line" and "mutate live entity" on a multiplayer game server: a registry
//! of permission-gated commands, a dispatcher that authorizes and routes
//! each invocation, a security comparator for actor-vs-target authority, and
//! the link-token grammar that pulls typed entity references out of pasted
//! chat text.
//!
//! ## Features
//!
//! - **Build-once command registry**: descriptors registered at startup,
//!   read-only and lock-free afterwards.
//! - **Permission + security gating**: per-command permission ids, ordered
//!   security levels with a console tier above everything, strict comparison
//!   for punitive account actions, offline targets via persisted lookups.
//! - **Reference links**: client item/spell/skill/item-set links and packed
//!   entity identifiers parsed into explicit typed references.
//! - **Proc counters**: per-entity property bags with
//!   increment-until-threshold semantics for "every Nth occurrence" effects.
//! - **Narrow collaborator seams**: the simulation, persistence, and access
//!   control are traits the embedding server implements.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gmshell::gm::commands::register_builtins;
//! use gmshell::gm::context::CommandSource;
//! use gmshell::gm::Policy;
//! use gmshell::{CommandRegistry, Dispatcher};
//! use gmshell::world::memory::InMemoryWorld;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let world = Arc::new(InMemoryWorld::demo());
//!     let mut registry = CommandRegistry::new();
//!     register_builtins(&mut registry)?;
//!     let dispatcher = Dispatcher::new(
//!         Arc::new(registry),
//!         world.clone(),
//!         world,
//!         Policy::default(),
//!     );
//!     let result = dispatcher
//!         .dispatch(CommandSource::Console, "pinfo Dorn")
//!         .await;
//!     for line in &result.replies {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`gm`] - registry, dispatcher, contexts, security, built-in commands
//! - [`link`] - reference-link token grammar
//! - [`props`] - property bags and proc counters
//! - [`world`] - collaborator seams and the in-memory reference world
//! - [`config`] - configuration management
//! - [`logutil`] - log sanitizing helpers

pub mod config;
pub mod gm;
pub mod link;
pub mod logutil;
pub mod props;
pub mod world;

pub use gm::dispatch::{DispatchOutcome, DispatchResult, Dispatcher};
pub use gm::registry::CommandRegistry;
