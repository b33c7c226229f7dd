use serde_json::Value;
use serenity::model::application::CommandOptionType;

use crate::command::{Command, CommandOption};
use crate::context::Context;
use crate::{BoxFuture, Error};

/// Check that the bot is alive
pub fn ping() -> Command {
    Command::new("ping", "Check that the bot is alive", run_ping)
}

fn run_ping<'a>(ctx: &'a Context<'_>) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        ctx.respond("🏓 Pong!").await?;
        Ok(())
    })
}

/// Repeat the given text
pub fn echo() -> Command {
    Command::new("echo", "Repeat the given text", run_echo)
        .alias("say")
        .option(
            CommandOption::new(CommandOptionType::String, "text", "Text to repeat").required(true),
        )
}

fn run_echo<'a>(ctx: &'a Context<'_>) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let text = ctx
            .arguments()
            .first()
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            ctx.respond("❌ Nothing to echo.").await?;
        } else {
            ctx.respond(text.to_string()).await?;
        }
        Ok(())
    })
}

/// Show who invoked the command and where
pub fn whoami() -> Command {
    Command::new("whoami", "Show who you are to the bot", run_whoami)
}

fn run_whoami<'a>(ctx: &'a Context<'_>) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let user = ctx.user();
        let location = match (ctx.guild(), ctx.member()) {
            (Some(guild_id), Some(member)) => format!(
                "in guild {} as {} with {} roles",
                guild_id,
                member.nick().unwrap_or(&user.name),
                member.roles().len()
            ),
            _ => "in a direct message".to_string(),
        };
        ctx.respond(format!(
            "You are **{}** ({}), {}",
            user.name, user.id, location
        ))
        .await?;
        Ok(())
    })
}
