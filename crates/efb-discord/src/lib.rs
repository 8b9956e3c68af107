//! Discord adapter (serenity).
//!
//! This crate implements the `efb-core` MessagingPort over the Discord HTTP API and runs
//! the gateway connection that feeds messages to the bot.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    builder::CreateMessage,
    http::Http,
    model::id::{ChannelId as DcChannelId, MessageId as DcMessageId, UserId},
};

pub mod router;

use efb_core::{
    domain::{ChannelId, DiscordId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{IncomingMessage, MessagingCapabilities},
    },
    Result,
};

/// Discord's hard limit on message content.
pub const DISCORD_MAX_MESSAGE_LEN: usize = 2000;

#[derive(Clone)]
pub struct DiscordMessenger {
    http: Arc<Http>,
}

impl DiscordMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn map_err(e: serenity::Error) -> Error {
        Error::External(format!("discord error: {e}"))
    }

    fn message_ref(msg: &serenity::model::channel::Message) -> MessageRef {
        MessageRef {
            channel_id: ChannelId(msg.channel_id.get()),
            message_id: MessageId(msg.id.get()),
        }
    }
}

/// Parse a Discord user id string into a snowflake.
pub fn parse_user_id(id: &DiscordId) -> Result<UserId> {
    match id.0.trim().parse::<u64>() {
        Ok(n) if n != 0 => Ok(UserId::new(n)),
        _ => Err(Error::InvalidInput(format!("not a Discord user id: {id}"))),
    }
}

#[async_trait]
impl MessagingPort for DiscordMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: DISCORD_MAX_MESSAGE_LEN,
        }
    }

    async fn reply(&self, to: &IncomingMessage, text: &str) -> Result<MessageRef> {
        let channel = DcChannelId::new(to.channel_id.0);
        let builder = CreateMessage::new()
            .content(text)
            .reference_message((channel, DcMessageId::new(to.message_id.0)));
        let msg = channel
            .send_message(&self.http, builder)
            .await
            .map_err(Self::map_err)?;
        Ok(Self::message_ref(&msg))
    }

    async fn send_direct(&self, user: &DiscordId, text: &str) -> Result<MessageRef> {
        let msg = parse_user_id(user)?
            .direct_message(&self.http, CreateMessage::new().content(text))
            .await
            .map_err(Self::map_err)?;
        Ok(Self::message_ref(&msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snowflakes() {
        let id = parse_user_id(&DiscordId("80351110224678912".to_string())).unwrap();
        assert_eq!(id.get(), 80351110224678912);
    }

    #[test]
    fn rejects_non_snowflakes() {
        for raw in ["", "abc", "0", "-5"] {
            let err = parse_user_id(&DiscordId(raw.to_string())).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{raw}");
        }
    }
}
