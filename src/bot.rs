use std::sync::Arc;

use crate::command::CommandRegistry;
use crate::config::Config;
use crate::outbound::Outbound;

/// Process-wide bot handle shared by every command context.
pub struct Bot {
    config: Config,
    outbound: Arc<dyn Outbound>,
    commands: CommandRegistry,
}

impl Bot {
    pub fn new(config: Config, outbound: Arc<dyn Outbound>, commands: CommandRegistry) -> Self {
        Self {
            config,
            outbound,
            commands,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn outbound(&self) -> &dyn Outbound {
        self.outbound.as_ref()
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }
}
