use std::fmt;

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;

use crate::context::Context;
use crate::error::RegistryError;
use crate::{BoxFuture, Error};

/// Function run when a command is invoked.
pub type Action = for<'a, 'b> fn(&'a Context<'b>) -> BoxFuture<'a, Result<(), Error>>;

/// A slash-command option declaration.
#[derive(Clone, Debug)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: CommandOptionType,
    pub required: bool,
}

impl CommandOption {
    pub fn new(
        kind: CommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A command definition, invocable by prefix and as a slash command.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    /// Extra names accepted for prefix invocations
    pub aliases: Vec<String>,
    /// Declared in the order their values appear in `Context::arguments`
    pub options: Vec<CommandOption>,
    pub action: Action,
}

impl Command {
    pub fn new(name: impl Into<String>, description: impl Into<String>, action: Action) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            aliases: Vec::new(),
            options: Vec::new(),
            action,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Case-insensitive match against the name and aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.names()
            .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Slash-command registration payload.
    pub fn create_command(&self) -> CreateCommand {
        self.options.iter().fold(
            CreateCommand::new(&self.name).description(&self.description),
            |builder, option| {
                builder.add_option(
                    CreateCommandOption::new(option.kind, &option.name, &option.description)
                        .required(option.required),
                )
            },
        )
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command; names and aliases must be unique across the registry.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        if let Some(taken) = command.names().find(|name| self.find(name).is_some()) {
            return Err(RegistryError::Duplicate(taken.to_string()));
        }
        self.commands.push(command);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn create_commands(&self) -> Vec<CreateCommand> {
        self.commands.iter().map(Command::create_command).collect()
    }
}
