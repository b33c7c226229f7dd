use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub discord_token: String,
    /// Prefixes that mark a text message as a command invocation
    pub prefixes: Vec<String>,
    pub status_message: String,
    pub dev_guild_id: Option<u64>,
    pub register_commands: bool,
}

const DEFAULT_PREFIX: &str = "!";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN must be set"))?,
            prefixes: Self::parse_prefixes(
                &env::var("PREFIXES").unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
            )?,
            status_message: env::var("STATUS_MESSAGE")
                .unwrap_or_else(|_| "Ready for commands".to_string()),
            dev_guild_id: env::var("DEV_GUILD_ID").ok().and_then(|id| id.parse().ok()),
            register_commands: env::var("REGISTER_COMMANDS")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }

    /// Splits a comma-separated prefix list, longest prefix first so that
    /// `!!` wins over `!`.
    fn parse_prefixes(raw: &str) -> anyhow::Result<Vec<String>> {
        let mut prefixes: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
            .collect();
        if prefixes.is_empty() {
            anyhow::bail!("PREFIXES must contain at least one non-empty prefix");
        }
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        prefixes.dedup();
        Ok(prefixes)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("prefixes", &self.prefixes)
            .field("status_message", &self.status_message)
            .field("dev_guild_id", &self.dev_guild_id)
            .field("register_commands", &self.register_commands)
            .finish()
    }
}
