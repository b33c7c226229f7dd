//! Turns gateway events into command contexts and runs the matching action.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::{Map, Value};
use serenity::client::{Context as SerenityContext, EventHandler};
use serenity::gateway::ActivityData;
use serenity::http::Http;
use serenity::model::application::{
    Command as ApplicationCommand, CommandDataOption, CommandDataOptionValue, CommandInteraction,
    Interaction as GatewayInteraction,
};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use tracing::{debug, error, info, warn};

use crate::bot::Bot;
use crate::command::{Command, CommandRegistry};
use crate::config::Config;
use crate::context::{Context, PendingContext};
use crate::outbound::{Interaction, InteractionResponder, SlashSession};
use crate::Error;

/// Returns the first configured prefix that starts `content`, and the text after it.
pub fn match_prefix<'p, 'c>(
    content: &'c str,
    prefixes: &'p [String],
) -> Option<(&'p str, &'c str)> {
    prefixes.iter().find_map(|prefix| {
        content
            .strip_prefix(prefix.as_str())
            .map(|rest| (prefix.as_str(), rest))
    })
}

/// Splits `rest` into the command name and the raw argument text.
pub fn split_invocation(rest: &str) -> Option<(&str, &str)> {
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = &rest[..name_end];
    if name.is_empty() {
        return None;
    }
    Some((name, rest[name_end..].trim_start()))
}

pub fn option_value(value: &CommandDataOptionValue) -> Value {
    match value {
        CommandDataOptionValue::Boolean(b) => Value::Bool(*b),
        CommandDataOptionValue::Integer(i) => Value::from(*i),
        CommandDataOptionValue::Number(n) => Value::from(*n),
        CommandDataOptionValue::String(s) => Value::String(s.clone()),
        CommandDataOptionValue::Autocomplete { value, .. } => Value::String(value.clone()),
        CommandDataOptionValue::User(id) => Value::String(id.get().to_string()),
        CommandDataOptionValue::Channel(id) => Value::String(id.get().to_string()),
        CommandDataOptionValue::Role(id) => Value::String(id.get().to_string()),
        CommandDataOptionValue::Mentionable(id) => Value::String(id.get().to_string()),
        CommandDataOptionValue::Attachment(id) => Value::String(id.get().to_string()),
        CommandDataOptionValue::SubCommand(options)
        | CommandDataOptionValue::SubCommandGroup(options) => {
            Value::Object(interaction_arguments(options).into_iter().collect::<Map<_, _>>())
        }
        _ => Value::Null,
    }
}

/// Option values keyed by option name.
pub fn interaction_arguments(options: &[CommandDataOption]) -> HashMap<String, Value> {
    options
        .iter()
        .map(|option| (option.name.clone(), option_value(&option.value)))
        .collect()
}

/// Orders interaction option values by the command's declared options.
/// Options the user left out become `null`.
pub fn slash_arguments(command: &Command, raw: &HashMap<String, Value>) -> Vec<Value> {
    command
        .options
        .iter()
        .map(|option| raw.get(&option.name).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Prefix invocations pass the raw argument text through as a single value.
pub fn message_arguments(raw: &str) -> Vec<Value> {
    if raw.is_empty() {
        Vec::new()
    } else {
        vec![Value::String(raw.to_string())]
    }
}

async fn run(ctx: &Context<'_>) {
    let command = ctx.command();
    info!(
        "Running command {} for {} in channel {}",
        command.name,
        ctx.user().name,
        ctx.channel()
    );

    if let Err(err) = (command.action)(ctx).await {
        error!("Command {} failed: {}", command.name, err);
        if let Err(send_err) = ctx.respond(format!("❌ Command failed: {}", err)).await {
            error!(
                "Could not report failure of command {}: {}",
                command.name, send_err
            );
        }
    }
}

/// Runs the command a prefixed message invokes, if any.
///
/// Returns whether a command ran.
pub async fn dispatch_message(bot: &Bot, message: &Message) -> Result<bool, Error> {
    let Some((prefix, rest)) = match_prefix(&message.content, &bot.config().prefixes) else {
        return Ok(false);
    };
    let Some((name, raw_arguments)) = split_invocation(rest) else {
        return Ok(false);
    };
    let Some(command) = bot.commands().find(name) else {
        debug!("Ignoring unknown command {}{}", prefix, name);
        return Ok(false);
    };

    let ctx = PendingContext::from_message(bot, command, prefix, message, raw_arguments)?
        .with_arguments(message_arguments(raw_arguments));
    run(&ctx).await;
    Ok(true)
}

/// Runs the command a slash-command interaction invokes.
///
/// The interaction is only deferred once a context could be built for it.
/// Unknown commands and invalid contexts get an ephemeral rejection instead,
/// so Discord never waits on an interaction nobody will answer.
pub async fn dispatch_slash<'a, R>(
    bot: &'a Bot,
    interaction: &'a dyn Interaction,
    session: &'a R,
    raw: HashMap<String, Value>,
) -> Result<bool, Error>
where
    R: InteractionResponder + 'a,
{
    let name = interaction.command_name();
    let Some(command) = bot.commands().find(name) else {
        warn!("Received unknown slash command {}", name);
        session.reject("❌ Unknown command.").await?;
        return Ok(false);
    };

    let arguments = slash_arguments(command, &raw);
    let pending = match PendingContext::from_interaction(bot, command, interaction, session, raw)
    {
        Ok(pending) => pending,
        Err(err) => {
            if let Err(send_err) = session.reject("❌ This command cannot run here.").await {
                warn!(
                    "Interaction {} left unanswered: {}",
                    interaction.id(),
                    send_err
                );
            }
            return Err(err.into());
        }
    };

    session.acknowledge().await?;
    run(&pending.with_arguments(arguments)).await;
    Ok(true)
}

/// Runs a serenity slash-command interaction through [`dispatch_slash`].
pub async fn dispatch_interaction(
    bot: &Bot,
    interaction: &CommandInteraction,
    http: Arc<Http>,
) -> Result<bool, Error> {
    let session = SlashSession::new(interaction, http);
    let raw = interaction_arguments(&interaction.data.options);
    dispatch_slash(bot, interaction, &session, raw).await
}

async fn register_commands(http: &Http, bot: &Bot) -> Result<(), serenity::Error> {
    let commands = bot.commands().create_commands();
    let count = commands.len();
    match bot.config().dev_guild_id {
        Some(guild_id) => {
            GuildId::new(guild_id).set_commands(http, commands).await?;
            info!("Registered {} commands in guild {}", count, guild_id);
        }
        None => {
            ApplicationCommand::set_global_commands(http, commands).await?;
            info!("Registered {} global commands", count);
        }
    }
    Ok(())
}

/// Gateway event handler that owns the command registry.
///
/// The shared [`Bot`] is created on the first `ready`, once serenity's HTTP
/// client is available.
pub struct Dispatcher {
    config: Config,
    commands: CommandRegistry,
    bot: OnceLock<Arc<Bot>>,
}

impl Dispatcher {
    pub fn new(config: Config, commands: CommandRegistry) -> Self {
        Self {
            config,
            commands,
            bot: OnceLock::new(),
        }
    }

    pub fn bot(&self) -> Option<&Arc<Bot>> {
        self.bot.get()
    }
}

#[async_trait]
impl EventHandler for Dispatcher {
    async fn ready(&self, ctx: SerenityContext, ready: Ready) {
        info!("{} is connected", ready.user.name);
        let bot = self.bot.get_or_init(|| {
            Arc::new(Bot::new(
                self.config.clone(),
                ctx.http.clone(),
                self.commands.clone(),
            ))
        });

        ctx.set_activity(Some(ActivityData::custom(&bot.config().status_message)));

        if bot.config().register_commands {
            if let Err(e) = register_commands(&ctx.http, bot).await {
                error!("Failed to register slash commands: {}", e);
            }
        }
    }

    async fn message(&self, _ctx: SerenityContext, new_message: Message) {
        if new_message.author.bot {
            return;
        }
        let Some(bot) = self.bot.get() else {
            warn!("Message {} arrived before ready, ignoring", new_message.id);
            return;
        };
        if let Err(e) = dispatch_message(bot, &new_message).await {
            error!("Failed to dispatch message {}: {}", new_message.id, e);
        }
    }

    async fn interaction_create(&self, ctx: SerenityContext, interaction: GatewayInteraction) {
        let GatewayInteraction::Command(interaction) = interaction else {
            return;
        };
        let Some(bot) = self.bot.get() else {
            warn!("Interaction {} arrived before ready, ignoring", interaction.id);
            return;
        };
        if let Err(e) = dispatch_interaction(bot, &interaction, ctx.http.clone()).await {
            error!("Failed to dispatch interaction {}: {}", interaction.id, e);
        }
    }
}
