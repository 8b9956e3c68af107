use crate::domain::{ChannelId, DiscordId, MessageId, MessageRef};

/// Platform-neutral incoming chat message.
///
/// Discord-specific fields stay in the Discord adapter.
#[derive(Clone, Debug)]
pub struct IncomingMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_id: DiscordId,
    pub author_name: String,
    pub author_is_bot: bool,
    pub content: String,
}

impl IncomingMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef {
            channel_id: self.channel_id,
            message_id: self.message_id,
        }
    }
}

/// Capabilities / limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
}
