//! Outgoing message descriptor shared by plain sends, replies and
//! interaction follow-ups.

use serenity::builder::{
    CreateAllowedMentions, CreateAttachment, CreateEmbed, CreateInteractionResponseFollowup,
    CreateMessage,
};
use serenity::model::channel::MessageReference;

/// What to send, independent of how it is delivered.
#[derive(Clone, Debug, Default)]
pub struct MessageContent {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub attachments: Vec<CreateAttachment>,
    pub allowed_mentions: Option<CreateAllowedMentions>,
    /// Only honoured by interaction follow-ups.
    pub ephemeral: bool,
}

impl MessageContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn attachment(mut self, attachment: CreateAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn allowed_mentions(mut self, allowed_mentions: CreateAllowedMentions) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    /// Builds a channel message, reply-linked when `reference` is set.
    pub fn into_message(self, reference: Option<MessageReference>) -> CreateMessage {
        let mut builder = CreateMessage::new()
            .embeds(self.embeds)
            .add_files(self.attachments);
        if let Some(content) = self.content {
            builder = builder.content(content);
        }
        if let Some(allowed_mentions) = self.allowed_mentions {
            builder = builder.allowed_mentions(allowed_mentions);
        }
        if let Some(reference) = reference {
            builder = builder.reference_message(reference);
        }
        builder
    }

    pub fn into_followup(self) -> CreateInteractionResponseFollowup {
        let mut builder = CreateInteractionResponseFollowup::new()
            .embeds(self.embeds)
            .add_files(self.attachments)
            .ephemeral(self.ephemeral);
        if let Some(content) = self.content {
            builder = builder.content(content);
        }
        if let Some(allowed_mentions) = self.allowed_mentions {
            builder = builder.allowed_mentions(allowed_mentions);
        }
        builder
    }
}

impl From<&str> for MessageContent {
    fn from(content: &str) -> Self {
        Self::new().content(content)
    }
}

impl From<String> for MessageContent {
    fn from(content: String) -> Self {
        Self::new().content(content)
    }
}
