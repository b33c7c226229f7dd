/// Errors produced while sending messages to Discord.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Discord answered the request with a non-success status, e.g. the
    /// referenced message no longer exists or the bot lacks permissions.
    #[error("discord rejected the request with status {status}: {message}")]
    Response { status: u16, message: String },

    #[error("serenity error: {0}")]
    Client(serenity::Error),
}

impl SendError {
    /// True when Discord itself rejected the request.
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Client(_) => None,
        }
    }
}

impl From<serenity::Error> for SendError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(http) = &err {
            if let Some(status) = http.status_code() {
                return Self::Response {
                    status: status.as_u16(),
                    message: http.to_string(),
                };
            }
        }
        Self::Client(err)
    }
}

/// Contract violations detected while building a command context.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("context has a guild but no guild member")]
    GuildWithoutMember,

    #[error("context has a guild member but no guild")]
    MemberWithoutGuild,
}

/// Errors produced while registering commands.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command name or alias `{0}` is already registered")]
    Duplicate(String),
}
