use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{DeliveryError, Notifier};

/// Base URL of the public Telegram Bot API.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Upper bound for a single `sendMessage` call.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// A notifier delivering plain text messages via the Telegram Bot API.
///
/// The endpoint URL embeds the bot token and must never be logged.
pub struct TelegramNotifier {
    client: Client,
    endpoint: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str) -> Result<Self, reqwest::Error> {
        Self::with_api_url(DEFAULT_API_URL, bot_token)
    }

    /// Point the notifier at a different Bot API server (self-hosted or a test stub)
    pub fn with_api_url(api_url: &str, bot_token: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(DELIVERY_TIMEOUT).build()?;

        Ok(Self { client, endpoint: send_message_endpoint(api_url, bot_token) })
    }
}

fn send_message_endpoint(api_url: &str, bot_token: &str) -> String {
    format!("{}/bot{bot_token}/sendMessage", api_url.trim_end_matches('/'))
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), DeliveryError> {
        let payload = SendMessage { chat_id: recipient, text: message };

        // Errors carry the request URL, which contains the bot token.
        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(DeliveryError::Rejected { status: status.as_u16(), body });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(reqwest::Error::without_url)?;
        if !api_response.ok {
            return Err(DeliveryError::Api {
                description: api_response
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        Ok(())
    }
}
