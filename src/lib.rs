pub mod bot;
pub mod command;
pub mod commands;
pub mod config;
pub mod content;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod outbound;

#[cfg(test)]
mod testing;

pub use bot::Bot;
pub use command::{Command, CommandOption, CommandRegistry};
pub use content::MessageContent;
pub use context::{Context, InteractionContext, MemberRef, MessageContext, PendingContext, Source};
pub use dispatch::Dispatcher;
pub use error::{ContextError, SendError};
pub use outbound::{Interaction, InteractionEvent, InteractionResponder, Outbound, SlashSession};

/// Error type returned by command actions
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by command actions
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
