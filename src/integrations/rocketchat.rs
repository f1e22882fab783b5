// src/integrations/rocketchat.rs — RocketChat adapter (REST API)
//
// Uses the RocketChat REST API with a personal access token
// (https://developer.rocket.chat/apidocs). Rooms may be public channels or
// private groups; history falls back to groups.history when the channel
// endpoint rejects the room.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::integrations::types::{IncomingMessage, Integration, MessagingAdapter};

/// RocketChat integration adapter.
pub struct RocketChatAdapter {
    client: Client,
    server_url: String,
    user_id: String,
    auth_token: String,
}

impl RocketChatAdapter {
    pub fn new(server_url: String, user_id: String, auth_token: String) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
            user_id,
            auth_token,
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/api/v1/{method}", self.server_url)
    }

    async fn api_get<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(self.api_url(method))
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .query(params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("RocketChat API {method} returned {status}: {body}");
        }

        Ok(resp.json().await?)
    }

    async fn api_post<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .post(self.api_url(method))
            .header("X-Auth-Token", &self.auth_token)
            .header("X-User-Id", &self.user_id)
            .json(body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("RocketChat API {method} returned {status}: {text}");
        }

        Ok(resp.json().await?)
    }

    /// Validate the token by fetching the current user.
    pub async fn validate(&self) -> anyhow::Result<String> {
        #[derive(Deserialize)]
        struct Me {
            username: Option<String>,
        }

        let me: Me = self.api_get("me", &[]).await?;
        Ok(format!(
            "RocketChat: authenticated as {} on {}",
            me.username.unwrap_or_default(),
            self.server_url
        ))
    }
}

// -- RocketChat API response types --

#[derive(Deserialize)]
struct HistoryResp {
    #[serde(default)]
    messages: Vec<RcMessage>,
}

#[derive(Deserialize)]
struct RcMessage {
    #[serde(rename = "_id")]
    id: String,
    rid: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    ts: String,
    u: RcUser,
}

#[derive(Deserialize)]
struct RcUser {
    #[serde(rename = "_id")]
    id: String,
    username: String,
}

#[derive(Deserialize)]
struct PostMessageResp {
    message: Option<PostedMessage>,
}

#[derive(Deserialize)]
struct PostedMessage {
    #[serde(rename = "_id")]
    id: String,
}

// -- MessagingAdapter implementation --

#[async_trait]
impl MessagingAdapter for RocketChatAdapter {
    async fn send(&self, target: &str, content: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "roomId": target,
            "text": content,
        });

        let resp: PostMessageResp = self.api_post("chat.postMessage", &body).await?;
        Ok(resp.message.map(|m| m.id).unwrap_or_default())
    }

    async fn history(&self, channel: &str, limit: u32) -> anyhow::Result<Vec<IncomingMessage>> {
        let count = limit.to_string();
        let params = [("roomId", channel), ("count", count.as_str())];

        let resp: HistoryResp = match self.api_get("channels.history", &params).await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("channels.history failed for {channel}, trying groups: {e}");
                self.api_get("groups.history", &params).await?
            }
        };

        // Newest first on the wire; our own replies are skipped.
        let result = resp
            .messages
            .into_iter()
            .rev()
            .filter(|m| m.u.id != self.user_id)
            .map(|m| IncomingMessage {
                id: m.id,
                channel: m.rid,
                sender: m.u.username,
                content: m.msg,
                timestamp: m.ts,
            })
            .collect();

        Ok(result)
    }
}

// -- Integration trait --

impl Integration for RocketChatAdapter {
    fn id(&self) -> &str {
        "rocketchat"
    }

    fn name(&self) -> &str {
        "RocketChat"
    }

    fn messaging(&self) -> Option<&dyn MessagingAdapter> {
        Some(self)
    }
}
