use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::ChatAction,
    Result,
};

/// Cross-messenger port: "deliver a message/photo to a destination".
///
/// Telegram is the first implementation; the shape is narrow on purpose so
/// the pipeline can be exercised with in-memory fakes.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    /// HTML-formatted message with link previews disabled; used for the
    /// operator-side error reports.
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    /// Deliver a photo by its public URL; the platform fetches the bytes.
    async fn send_photo_url(&self, chat_id: ChatId, url: &str) -> Result<MessageRef>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;
}
