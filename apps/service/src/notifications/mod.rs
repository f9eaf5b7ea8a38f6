use async_trait::async_trait;
use thiserror::Error;

pub mod message;
pub mod telegram;

pub use message::NotificationMessage;
pub use telegram::TelegramNotifier;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("messaging API returned non-success status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("messaging API refused the message: {description}")]
    Api { description: String },
}

/// Delivers a plain text message to a recipient.
///
/// One attempt per call, no retry. Shared by every monitor loop, so
/// implementations must be safe for concurrent use and must not mix the
/// content of concurrent calls.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> Result<(), DeliveryError>;
}
