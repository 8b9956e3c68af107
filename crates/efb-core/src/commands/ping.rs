use std::sync::Arc;

use async_trait::async_trait;

use crate::{bot::BotContext, messaging::types::IncomingMessage, Result};

use super::{bound, Command};

/// Liveness check.
#[derive(Default)]
pub struct PingCommand {
    bot: Option<Arc<BotContext>>,
}

#[async_trait]
impl Command for PingCommand {
    fn init(&mut self, bot: Arc<BotContext>) -> &'static str {
        self.bot = Some(bot);
        "ping"
    }

    async fn run(&self, message: &IncomingMessage) -> Result<()> {
        bound(&self.bot)?.reply(message, "pong").await
    }
}
