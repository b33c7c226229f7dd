//! Recording fakes for the Discord seams, shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serenity::http::{ErrorResponse, HttpError};
use serenity::model::channel::Message;
use serenity::model::guild::{Member, PartialMember};
use serenity::model::id::{ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId};
use serenity::model::user::User;

use crate::bot::Bot;
use crate::command::{Command, CommandRegistry};
use crate::config::Config;
use crate::content::MessageContent;
use crate::context::Context;
use crate::error::SendError;
use crate::outbound::{Interaction, InteractionEvent, InteractionResponder, Outbound};
use crate::{BoxFuture, Error};

pub const TEST_CHANNEL: u64 = 100;
pub const TEST_USER: u64 = 7;

pub fn test_config() -> Config {
    Config {
        discord_token: "test".to_string(),
        prefixes: vec!["!".to_string()],
        status_message: "test".to_string(),
        dev_guild_id: None,
        register_commands: false,
    }
}

fn noop<'a>(_ctx: &'a Context<'_>) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async { Ok(()) })
}

pub fn test_command(name: &str) -> Command {
    Command::new(name, "test command", noop)
}

pub fn test_bot() -> (Bot, Arc<FakeOutbound>) {
    test_bot_with(CommandRegistry::new())
}

pub fn test_bot_with(commands: CommandRegistry) -> (Bot, Arc<FakeOutbound>) {
    let outbound = Arc::new(FakeOutbound::default());
    let bot = Bot::new(test_config(), outbound.clone(), commands);
    (bot, outbound)
}

pub fn test_user() -> User {
    let mut user = User::default();
    user.id = UserId::new(TEST_USER);
    user.name = "tester".to_string();
    user
}

/// A direct message from [`test_user`].
pub fn dm_message(id: u64, content: &str) -> Message {
    let mut msg = Message::default();
    msg.id = MessageId::new(id);
    msg.channel_id = ChannelId::new(TEST_CHANNEL);
    msg.author = test_user();
    msg.content = content.to_string();
    msg
}

pub fn guild_member() -> PartialMember {
    serde_json::from_value(serde_json::json!({
        "deaf": false,
        "mute": false,
        "nick": "Nick",
        "roles": [],
        "pending": false,
        "flags": 0,
        "joined_at": "2024-01-01T00:00:00.000000+00:00",
    }))
    .expect("valid partial member")
}

/// A full guild member, as delivered with interactions.
pub fn full_member(guild: GuildId) -> Member {
    let mut member = Member::default();
    member.user = test_user();
    member.nick = Some("Slash".to_string());
    member.roles = vec![RoleId::new(3), RoleId::new(4)];
    member.guild_id = guild;
    member
}

/// The error serenity returns when Discord answers with `status` and a JSON error body.
pub async fn discord_error(status: u16, code: isize, message: &str) -> serenity::Error {
    let body = serde_json::json!({ "code": code, "message": message }).to_string();
    let response = http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body)
        .expect("valid http response");
    let response =
        ErrorResponse::from_response(reqwest::Response::from(response), reqwest::Method::POST)
            .await;
    serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
}

#[derive(Clone, Debug)]
pub struct SentMessage {
    pub channel: ChannelId,
    pub content: Option<String>,
    pub reply_to: Option<MessageId>,
}

/// Records channel sends and fails them on request.
#[derive(Default)]
pub struct FakeOutbound {
    calls: Mutex<Vec<SentMessage>>,
    failures: Mutex<VecDeque<SendError>>,
}

impl FakeOutbound {
    pub fn fail_next(&self, err: SendError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn calls(&self) -> Vec<SentMessage> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Outbound for FakeOutbound {
    async fn send_message(
        &self,
        channel: ChannelId,
        content: MessageContent,
        reply_to: Option<MessageId>,
    ) -> Result<Message, SendError> {
        self.calls.lock().unwrap().push(SentMessage {
            channel,
            content: content.content.clone(),
            reply_to,
        });
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let mut message = Message::default();
        message.channel_id = channel;
        message.content = content.content.unwrap_or_default();
        Ok(message)
    }
}

pub struct FakeInteraction {
    pub name: String,
    pub channel: ChannelId,
    pub guild: Option<GuildId>,
    pub user: User,
    pub member: Option<Member>,
}

impl FakeInteraction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            channel: ChannelId::new(TEST_CHANNEL + 1),
            guild: None,
            user: test_user(),
            member: None,
        }
    }
}

impl Interaction for FakeInteraction {
    fn id(&self) -> InteractionId {
        InteractionId::new(1)
    }

    fn command_name(&self) -> &str {
        &self.name
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.guild
    }

    fn channel_id(&self) -> ChannelId {
        self.channel
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    fn locale(&self) -> &str {
        "en-US"
    }
}

/// Records interaction responses and fails follow-ups on request.
#[derive(Default)]
pub struct FakeEvent {
    contents: Mutex<Vec<Option<String>>>,
    failures: Mutex<VecDeque<SendError>>,
    sent: AtomicUsize,
    acknowledged: AtomicBool,
    rejections: Mutex<Vec<String>>,
}

impl FakeEvent {
    pub fn fail_next(&self, err: SendError) {
        self.failures.lock().unwrap().push_back(err);
    }

    pub fn contents(&self) -> Vec<Option<String>> {
        self.contents.lock().unwrap().clone()
    }

    pub fn acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::Relaxed)
    }

    pub fn rejections(&self) -> Vec<String> {
        self.rejections.lock().unwrap().clone()
    }
}

#[async_trait]
impl InteractionEvent for FakeEvent {
    async fn followup(&self, content: MessageContent) -> Result<Message, SendError> {
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.contents.lock().unwrap().push(content.content.clone());
        self.sent.fetch_add(1, Ordering::Relaxed);
        let mut message = Message::default();
        message.content = content.content.unwrap_or_default();
        Ok(message)
    }

    fn followups_sent(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InteractionResponder for FakeEvent {
    async fn acknowledge(&self) -> Result<(), SendError> {
        self.acknowledged.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn reject(&self, reason: &str) -> Result<(), SendError> {
        self.rejections.lock().unwrap().push(reason.to_string());
        Ok(())
    }
}
