//! Seams between command contexts and the Discord HTTP API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::{CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::http::Http;
use serenity::model::application::CommandInteraction;
use serenity::model::channel::{Message, MessageReference};
use serenity::model::guild::Member;
use serenity::model::id::{ChannelId, GuildId, InteractionId, MessageId};
use serenity::model::user::User;
use tracing::debug;

use crate::content::MessageContent;
use crate::error::SendError;

/// Delivers channel messages on behalf of the bot.
#[async_trait]
pub trait Outbound: Send + Sync {
    /// Sends `content` to `channel`, as a reply to `reply_to` when given.
    async fn send_message(
        &self,
        channel: ChannelId,
        content: MessageContent,
        reply_to: Option<MessageId>,
    ) -> Result<Message, SendError>;
}

#[async_trait]
impl Outbound for Http {
    async fn send_message(
        &self,
        channel: ChannelId,
        content: MessageContent,
        reply_to: Option<MessageId>,
    ) -> Result<Message, SendError> {
        let reference = reply_to.map(|id| MessageReference::from((channel, id)));
        let builder = content.into_message(reference);
        Ok(channel.send_message(self, builder).await?)
    }
}

/// A slash-command interaction as seen by a command context.
pub trait Interaction: Send + Sync {
    fn id(&self) -> InteractionId;
    fn command_name(&self) -> &str;
    fn guild_id(&self) -> Option<GuildId>;
    fn channel_id(&self) -> ChannelId;
    fn user(&self) -> &User;
    fn member(&self) -> Option<&Member>;
    fn locale(&self) -> &str;

    /// The underlying serenity interaction, when there is one.
    fn as_command(&self) -> Option<&CommandInteraction> {
        None
    }
}

impl Interaction for CommandInteraction {
    fn id(&self) -> InteractionId {
        self.id
    }

    fn command_name(&self) -> &str {
        &self.data.name
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn member(&self) -> Option<&Member> {
        self.member.as_deref()
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn as_command(&self) -> Option<&CommandInteraction> {
        Some(self)
    }
}

/// The live response channel of an interaction.
#[async_trait]
pub trait InteractionEvent: Send + Sync {
    async fn followup(&self, content: MessageContent) -> Result<Message, SendError>;

    /// Number of follow-ups delivered so far.
    fn followups_sent(&self) -> usize;
}

/// The initial response to an interaction, sent at most once before any follow-up.
#[async_trait]
pub trait InteractionResponder: InteractionEvent {
    /// Defers the response so follow-ups can be sent later.
    async fn acknowledge(&self) -> Result<(), SendError>;

    /// Answers with an ephemeral notice instead of running a command.
    async fn reject(&self, reason: &str) -> Result<(), SendError>;
}

/// Response session for a serenity `CommandInteraction`.
pub struct SlashSession<'a> {
    interaction: &'a CommandInteraction,
    http: Arc<Http>,
    followups: AtomicUsize,
}

impl<'a> SlashSession<'a> {
    pub fn new(interaction: &'a CommandInteraction, http: Arc<Http>) -> Self {
        Self {
            interaction,
            http,
            followups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl InteractionEvent for SlashSession<'_> {
    async fn followup(&self, content: MessageContent) -> Result<Message, SendError> {
        let message = self
            .interaction
            .create_followup(&*self.http, content.into_followup())
            .await?;
        self.followups.fetch_add(1, Ordering::Relaxed);
        Ok(message)
    }

    fn followups_sent(&self) -> usize {
        self.followups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InteractionResponder for SlashSession<'_> {
    async fn acknowledge(&self) -> Result<(), SendError> {
        self.interaction.defer(&*self.http).await?;
        debug!("Deferred interaction {}", self.interaction.id);
        Ok(())
    }

    async fn reject(&self, reason: &str) -> Result<(), SendError> {
        let message = CreateInteractionResponseMessage::new()
            .content(reason)
            .ephemeral(true);
        self.interaction
            .create_response(&*self.http, CreateInteractionResponse::Message(message))
            .await?;
        debug!("Rejected interaction {}", self.interaction.id);
        Ok(())
    }
}
