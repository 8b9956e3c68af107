//! Chat commands.
//!
//! Each command reports its name from `init` and answers in `run`. The bot indexes
//! commands by that name; see [`crate::bot::Bot::register`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    bot::BotContext, errors::Error, messaging::types::IncomingMessage, user::User, Result,
};

mod help;
mod list;
mod ping;
mod show;

pub use help::HelpCommand;
pub use list::ListCommand;
pub use ping::PingCommand;
pub use show::ShowCommand;

#[async_trait]
pub trait Command: Send + Sync {
    /// Bind the command to its bot and return the name it answers to.
    fn init(&mut self, bot: Arc<BotContext>) -> &'static str;

    /// Answer `message`. Reply failures propagate unchanged.
    async fn run(&self, message: &IncomingMessage) -> Result<()>;
}

fn bound(bot: &Option<Arc<BotContext>>) -> Result<&BotContext> {
    bot.as_deref()
        .ok_or_else(|| Error::Config("command used before init".to_string()))
}

/// Record of the message author, loaded from the store.
fn author_record(bot: &BotContext, message: &IncomingMessage) -> Result<User> {
    let mut user = bot.user();
    user.load_discord_id(&message.author_id.0)?;
    Ok(user)
}

/// Send the author a fresh registration link in private and say so in the channel.
async fn send_register_link(
    bot: &BotContext,
    message: &IncomingMessage,
    user: &mut User,
) -> Result<()> {
    let link = user.get_register_link()?;
    bot.messenger
        .send_direct(
            &message.author_id,
            &format!(
                "Open this link to connect your EVE character to this Discord account. It only works once:\n{link}"
            ),
        )
        .await?;
    bot.reply(
        message,
        "Your Discord account is not linked to an EVE character yet. I sent you a registration link in a direct message.",
    )
    .await
}
