// src/integrations/discord.rs — Discord adapter (Bot API)
//
// Uses the Discord REST API (https://discord.com/developers/docs/reference).
// Reading message content requires the MESSAGE_CONTENT privileged intent.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::integrations::types::{IncomingMessage, Integration, MessagingAdapter};

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Discord rejects message bodies above this many characters.
pub const DISCORD_MAX_MESSAGE_LEN: usize = 2000;

/// Discord integration adapter.
pub struct DiscordAdapter {
    client: Client,
    bot_token: String,
}

impl DiscordAdapter {
    pub fn new(bot_token: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
        }
    }

    /// Make an authenticated GET request to the Discord API.
    async fn api_get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = format!("{DISCORD_API_BASE}{path}");
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .query(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Discord API {path} returned {status}: {body}");
        }

        let body: T = resp.json().await?;
        Ok(body)
    }

    /// Make an authenticated POST request to the Discord API.
    async fn api_post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<T> {
        let url = format!("{DISCORD_API_BASE}{path}");
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Discord API {path} returned {status}: {text}");
        }

        let body: T = resp.json().await?;
        Ok(body)
    }

    /// Validate the bot token by fetching the current user.
    pub async fn validate(&self) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct User {
            username: Option<String>,
        }

        let user: User = self.api_get("/users/@me", &[]).await?;
        Ok(format!(
            "Discord: authenticated as {}",
            user.username.unwrap_or_default()
        ))
    }
}

// -- Discord API response types --

#[derive(Deserialize)]
struct DiscordMessage {
    id: String,
    channel_id: String,
    author: DiscordAuthor,
    content: String,
    timestamp: String,
}

#[derive(Deserialize)]
struct DiscordAuthor {
    username: String,
    #[serde(default)]
    bot: bool,
}

#[derive(Deserialize)]
struct CreateMessageResp {
    id: String,
}

// -- MessagingAdapter implementation --

#[async_trait]
impl MessagingAdapter for DiscordAdapter {
    async fn send(&self, target: &str, content: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "content": content,
        });

        let resp: CreateMessageResp = self
            .api_post(&format!("/channels/{target}/messages"), &body)
            .await?;

        Ok(resp.id)
    }

    async fn history(&self, channel: &str, limit: u32) -> anyhow::Result<Vec<IncomingMessage>> {
        let limit_str = limit.clamp(1, 100).to_string();
        let messages: Vec<DiscordMessage> = self
            .api_get(
                &format!("/channels/{channel}/messages"),
                &[("limit", &limit_str)],
            )
            .await?;

        // Discord returns newest first; bot authors (including us) are skipped.
        let result = messages
            .into_iter()
            .rev()
            .filter(|m| !m.author.bot)
            .map(|m| IncomingMessage {
                id: m.id,
                channel: m.channel_id,
                sender: m.author.username,
                content: m.content,
                timestamp: m.timestamp,
            })
            .collect();

        Ok(result)
    }

    fn max_message_len(&self) -> usize {
        DISCORD_MAX_MESSAGE_LEN
    }
}

// -- Integration trait --

impl Integration for DiscordAdapter {
    fn id(&self) -> &str {
        "discord"
    }

    fn name(&self) -> &str {
        "Discord"
    }

    fn messaging(&self) -> Option<&dyn MessagingAdapter> {
        Some(self)
    }
}
