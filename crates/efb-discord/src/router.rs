use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    client::{Client, Context, EventHandler},
    http::Http,
    model::{channel::Message, gateway::Ready},
    prelude::GatewayIntents,
};
use tracing::info;

use efb_core::{
    bot::{Bot, BotContext},
    config::Config,
    domain::{ChannelId, DiscordId, MessageId},
    messaging::{port::MessagingPort, types::IncomingMessage},
    ports::{CharacterApi, KeyValueStore},
};

use crate::DiscordMessenger;

struct Handler {
    bot: Bot,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: Message) {
        self.bot.handle(&to_incoming(&msg)).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            commands = ?self.bot.command_names(),
            "discord gateway ready"
        );
    }
}

/// Connect to the Discord gateway and answer prefixed commands until the connection ends.
pub async fn run_gateway(
    cfg: Arc<Config>,
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn CharacterApi>,
) -> anyhow::Result<()> {
    let http = Arc::new(Http::new(&cfg.discord_token));
    let messenger: Arc<dyn MessagingPort> = Arc::new(DiscordMessenger::new(http));

    let ctx = Arc::new(BotContext {
        messenger,
        msg_prefix: cfg.msg_prefix.clone(),
        store,
        api,
        site: cfg.clone(),
    });
    let handler = Handler {
        bot: Bot::with_default_commands(ctx),
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    info!(prefix = %cfg.msg_prefix, "connecting to discord");
    let mut client = Client::builder(&cfg.discord_token, intents)
        .event_handler(handler)
        .await?;
    client.start().await?;
    Ok(())
}

fn to_incoming(msg: &Message) -> IncomingMessage {
    IncomingMessage {
        channel_id: ChannelId(msg.channel_id.get()),
        message_id: MessageId(msg.id.get()),
        author_id: DiscordId(msg.author.id.get().to_string()),
        author_name: msg.author.name.clone(),
        author_is_bot: msg.author.bot,
        content: msg.content.clone(),
    }
}
