//! Per-invocation command context.
//!
//! A context is built once for each triggering event, either a prefixed text
//! message or a slash-command interaction, and handed to exactly one command
//! action. It borrows everything from the event and the bot, so it cannot
//! outlive either.

use std::collections::HashMap;

use serde_json::Value;
use serenity::model::channel::Message;
use serenity::model::guild::{Member, PartialMember};
use serenity::model::id::{ChannelId, GuildId, RoleId};
use serenity::model::user::User;
use tracing::warn;

use crate::bot::Bot;
use crate::command::Command;
use crate::content::MessageContent;
use crate::error::{ContextError, SendError};
use crate::outbound::{Interaction, InteractionEvent, Outbound};

/// Guild profile of the invoking user.
#[derive(Clone, Copy, Debug)]
pub enum MemberRef<'a> {
    /// Partial member attached to gateway messages
    Partial(&'a PartialMember),
    /// Full member attached to interactions
    Full(&'a Member),
}

impl<'a> MemberRef<'a> {
    pub fn nick(&self) -> Option<&'a str> {
        match *self {
            Self::Partial(member) => member.nick.as_deref(),
            Self::Full(member) => member.nick.as_deref(),
        }
    }

    pub fn roles(&self) -> &'a [RoleId] {
        match *self {
            Self::Partial(member) => &member.roles,
            Self::Full(member) => &member.roles,
        }
    }
}

/// Context payload for commands triggered by a prefixed text message.
pub struct MessageContext<'a> {
    pub prefix: &'a str,
    pub message: &'a Message,
    /// Message content left after the prefix and command name.
    pub raw_arguments: &'a str,
}

impl MessageContext<'_> {
    async fn respond(
        &self,
        outbound: &dyn Outbound,
        channel: ChannelId,
        content: MessageContent,
    ) -> Result<Message, SendError> {
        match outbound
            .send_message(channel, content.clone(), Some(self.message.id))
            .await
        {
            // The triggering message may be gone by now; answer without the reference.
            Err(err) if err.is_response() => {
                warn!(
                    "Reply to message {} in channel {} failed ({}), sending without reference",
                    self.message.id, channel, err
                );
                outbound.send_message(channel, content, None).await
            }
            result => result,
        }
    }
}

/// Context payload for commands triggered by a slash-command interaction.
pub struct InteractionContext<'a> {
    pub interaction: &'a dyn Interaction,
    pub event: &'a dyn InteractionEvent,
    /// Option values keyed by option name, as delivered by Discord.
    pub raw_arguments: HashMap<String, Value>,
}

impl InteractionContext<'_> {
    async fn respond(&self, content: MessageContent) -> Result<Message, SendError> {
        self.event.followup(content).await
    }
}

/// The event that triggered a command.
pub enum Source<'a> {
    Message(MessageContext<'a>),
    Interaction(InteractionContext<'a>),
}

/// Fields every context carries regardless of its source.
pub struct ContextParts<'a> {
    pub bot: &'a Bot,
    pub guild: Option<GuildId>,
    pub channel: ChannelId,
    pub member: Option<MemberRef<'a>>,
    pub user: &'a User,
    pub command: &'a Command,
}

/// A context whose arguments have not been attached yet.
///
/// Command actions only ever receive a [`Context`], which can only be
/// obtained through [`PendingContext::with_arguments`].
pub struct PendingContext<'a> {
    parts: ContextParts<'a>,
    source: Source<'a>,
}

impl<'a> PendingContext<'a> {
    /// Builds a context, rejecting a guild without a member and vice versa.
    pub fn new(parts: ContextParts<'a>, source: Source<'a>) -> Result<Self, ContextError> {
        match (parts.guild.is_some(), parts.member.is_some()) {
            (true, false) => return Err(ContextError::GuildWithoutMember),
            (false, true) => return Err(ContextError::MemberWithoutGuild),
            _ => {}
        }
        Ok(Self { parts, source })
    }

    pub fn from_message(
        bot: &'a Bot,
        command: &'a Command,
        prefix: &'a str,
        message: &'a Message,
        raw_arguments: &'a str,
    ) -> Result<Self, ContextError> {
        let parts = ContextParts {
            bot,
            guild: message.guild_id,
            channel: message.channel_id,
            member: message.member.as_deref().map(MemberRef::Partial),
            user: &message.author,
            command,
        };
        let source = Source::Message(MessageContext {
            prefix,
            message,
            raw_arguments,
        });
        Self::new(parts, source)
    }

    pub fn from_interaction(
        bot: &'a Bot,
        command: &'a Command,
        interaction: &'a dyn Interaction,
        event: &'a dyn InteractionEvent,
        raw_arguments: HashMap<String, Value>,
    ) -> Result<Self, ContextError> {
        let parts = ContextParts {
            bot,
            guild: interaction.guild_id(),
            channel: interaction.channel_id(),
            member: interaction.member().map(MemberRef::Full),
            user: interaction.user(),
            command,
        };
        let source = Source::Interaction(InteractionContext {
            interaction,
            event,
            raw_arguments,
        });
        Self::new(parts, source)
    }

    pub fn command(&self) -> &'a Command {
        self.parts.command
    }

    pub fn source(&self) -> &Source<'a> {
        &self.source
    }

    pub fn with_arguments(self, arguments: Vec<Value>) -> Context<'a> {
        Context {
            parts: self.parts,
            source: self.source,
            arguments,
        }
    }
}

/// Everything a command action needs to run and answer.
pub struct Context<'a> {
    parts: ContextParts<'a>,
    source: Source<'a>,
    arguments: Vec<Value>,
}

impl<'a> Context<'a> {
    pub fn bot(&self) -> &'a Bot {
        self.parts.bot
    }

    /// `None` for direct messages.
    pub fn guild(&self) -> Option<GuildId> {
        self.parts.guild
    }

    pub fn channel(&self) -> ChannelId {
        self.parts.channel
    }

    /// Present exactly when [`Context::guild`] is.
    pub fn member(&self) -> Option<MemberRef<'a>> {
        self.parts.member
    }

    pub fn user(&self) -> &'a User {
        self.parts.user
    }

    pub fn command(&self) -> &'a Command {
        self.parts.command
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn arguments_mut(&mut self) -> &mut Vec<Value> {
        &mut self.arguments
    }

    pub fn source(&self) -> &Source<'a> {
        &self.source
    }

    pub fn is_message(&self) -> bool {
        matches!(self.source, Source::Message(_))
    }

    pub fn is_interaction(&self) -> bool {
        matches!(self.source, Source::Interaction(_))
    }

    /// Sends a plain, non-reply message to the context channel.
    pub async fn send(&self, content: impl Into<MessageContent>) -> Result<Message, SendError> {
        self.parts
            .bot
            .outbound()
            .send_message(self.parts.channel, content.into(), None)
            .await
    }

    /// Answers the invocation in the way that fits its source.
    ///
    /// Message invocations get a reply to the triggering message, falling back
    /// to a plain send once if Discord rejects the reply. Interaction
    /// invocations get a follow-up on the interaction; failures propagate.
    pub async fn respond(&self, content: impl Into<MessageContent>) -> Result<Message, SendError> {
        let content = content.into();
        match &self.source {
            Source::Message(source) => {
                source
                    .respond(self.parts.bot.outbound(), self.parts.channel, content)
                    .await
            }
            Source::Interaction(source) => source.respond(content).await,
        }
    }
}
