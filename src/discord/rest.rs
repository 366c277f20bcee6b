use async_trait::async_trait;
use serde_json::Value;

use super::{MessagingClient, MessagingError};

/// Bot-credentialed REST client used to post rendered panels.
pub struct DiscordRest {
    api_base: String,
    bot_token: Option<String>,
    http: reqwest::Client,
}

impl DiscordRest {
    pub fn new(api_base: impl Into<String>, bot_token: Option<String>, http: reqwest::Client) -> Self {
        Self {
            api_base: api_base.into(),
            bot_token,
            http,
        }
    }
}

#[async_trait]
impl MessagingClient for DiscordRest {
    async fn send_channel_message(&self, channel_id: u64, payload: &Value) -> Result<(), MessagingError> {
        let token = self.bot_token.as_deref().ok_or(MessagingError::MissingToken)?;

        let response = self
            .http
            .post(format!("{}/channels/{}/messages", self.api_base, channel_id))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {token}"))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessagingError::Rejected {
                channel_id,
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(channel_id, "panel posted");
        Ok(())
    }
}
