//! The built-in command set.
//!
//! Every body here is deliberately thin: parse the argument remainder, run
//! the security comparison where a target is involved, then make one or two
//! calls through the world seam and reply. Anything resembling game logic
//! lives on the other side of [crate::world::World].

mod account;
mod character;
mod meta;

use anyhow::Result;

use super::registry::CommandRegistry;

/// Register the full built-in table. Called once at startup; duplicate
/// names abort registration.
pub fn register_builtins(registry: &mut CommandRegistry) -> Result<()> {
    meta::register(registry)?;
    account::register(registry)?;
    character::register(registry)?;
    Ok(())
}
