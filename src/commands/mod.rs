pub mod utility;

use crate::command::{Command, CommandRegistry};
use crate::error::RegistryError;

/// Commands shipped with the bot binary.
pub fn builtin() -> Vec<Command> {
    vec![utility::ping(), utility::echo(), utility::whoami()]
}

pub fn builtin_registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    for command in builtin() {
        registry.register(command)?;
    }
    Ok(registry)
}
