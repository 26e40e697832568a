/// Discord REST delivery adapter
///
/// Sends rendered alerts to a channel via the bot API
/// (`POST /channels/{id}/messages` with `Authorization: Bot <token>`).
/// Retry policy deliberately lives with the caller's scheduler, not here.
use alerting::ports::DeliveryPort;
use anyhow::{Context, Result};
use preorder_core::DeliveryError;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, info};

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Discord caps a single message at 10 embeds.
const MAX_EMBEDS_PER_MESSAGE: usize = 10;

const EMBED_COLOR_BLUE: u32 = 0x3498DB;

pub struct DiscordNotifier {
    client: Client,
    token: String,
    api_base: String,
}

impl DiscordNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the adapter at a different API root (test doubles, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Shape one rendered alert into message payloads: each body becomes an
    /// embed, at most 10 embeds per request, header on the first request
    /// only. Payload order is the page order and must be sent sequentially.
    fn message_payloads(header: &str, bodies: &[String]) -> Vec<Value> {
        bodies
            .chunks(MAX_EMBEDS_PER_MESSAGE)
            .enumerate()
            .map(|(index, chunk)| {
                let embeds: Vec<Value> = chunk
                    .iter()
                    .map(|body| json!({ "description": body, "color": EMBED_COLOR_BLUE }))
                    .collect();
                if index == 0 {
                    json!({ "content": header, "embeds": embeds })
                } else {
                    json!({ "embeds": embeds })
                }
            })
            .collect()
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }
}

#[async_trait::async_trait]
impl DeliveryPort for DiscordNotifier {
    async fn ready(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/users/@me", self.api_base))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .context("Discord identity request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Discord rejected the bot token: HTTP {}", response.status());
        }

        let me: Value = response
            .json()
            .await
            .context("Discord identity response was not JSON")?;
        let username = me
            .get("username")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        info!("Logged in as {username}");
        Ok(username)
    }

    async fn deliver(
        &self,
        channel_id: u64,
        header: &str,
        bodies: &[String],
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/channels/{}/messages", self.api_base, channel_id);

        // Sequential sends keep page order intact for readers of the channel.
        for payload in Self::message_payloads(header, bodies) {
            let response = self
                .client
                .post(&url)
                .header("Authorization", self.auth_header())
                .json(&payload)
                .send()
                .await
                .map_err(|e| DeliveryError::Transport(e.to_string()))?;

            match response.status() {
                status if status.is_success() => {
                    debug!(channel_id, "message accepted");
                }
                StatusCode::NOT_FOUND => {
                    return Err(DeliveryError::ChannelNotFound(channel_id));
                }
                status => {
                    let message = response.text().await.unwrap_or_default();
                    return Err(DeliveryError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }

        Ok(())
    }
}
