use async_trait::async_trait;

use crate::{
    domain::{DiscordId, MessageRef},
    messaging::types::{IncomingMessage, MessagingCapabilities},
    Result,
};

/// Outbound chat port.
///
/// Callers keep each `text` within `capabilities().max_message_len`; see
/// [`crate::bot::BotContext::reply`] for the splitting helper.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    /// Reply in the channel the message came from, referencing it.
    async fn reply(&self, to: &IncomingMessage, text: &str) -> Result<MessageRef>;

    /// Send a private message to a user.
    async fn send_direct(&self, user: &DiscordId, text: &str) -> Result<MessageRef>;
}
