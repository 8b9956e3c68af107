use std::sync::Arc;

use async_trait::async_trait;

use crate::{bot::BotContext, messaging::types::IncomingMessage, Result};

use super::{bound, Command};

#[derive(Default)]
pub struct HelpCommand {
    bot: Option<Arc<BotContext>>,
}

impl HelpCommand {
    /// Usage instructions for `prefix`.
    pub fn help_text(prefix: &str) -> String {
        [
            "**Eve Fitting Bot Usage**".to_string(),
            format!("`{prefix} help` - show this message,"),
            format!("`{prefix} ping` - reply \"pong\" (test command),"),
            format!("`{prefix} list` - list all character fits,"),
            format!("`{prefix} show <id>` - return fit contents by @id."),
        ]
        .join("\n")
    }
}

#[async_trait]
impl Command for HelpCommand {
    fn init(&mut self, bot: Arc<BotContext>) -> &'static str {
        self.bot = Some(bot);
        "help"
    }

    async fn run(&self, message: &IncomingMessage) -> Result<()> {
        let bot = bound(&self.bot)?;
        bot.reply(message, &Self::help_text(&bot.msg_prefix)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::testing::{context, message, FakeMessenger},
        errors::Error,
        store::MemoryStore,
    };
    use serde_json::json;

    #[test]
    fn help_text_uses_prefix() {
        assert_eq!(
            HelpCommand::help_text("!fit"),
            "**Eve Fitting Bot Usage**\n\
             `!fit help` - show this message,\n\
             `!fit ping` - reply \"pong\" (test command),\n\
             `!fit list` - list all character fits,\n\
             `!fit show <id>` - return fit contents by @id."
        );
    }

    #[tokio::test]
    async fn replies_with_usage() {
        let messenger = Arc::new(FakeMessenger::default());
        let mut cmd = HelpCommand::default();
        let name = cmd.init(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));
        assert_eq!(name, "help");

        cmd.run(&message("1", "!fit help")).await.unwrap();

        assert_eq!(messenger.replies(), vec![HelpCommand::help_text("!fit")]);
    }

    #[tokio::test]
    async fn reply_failures_propagate() {
        let messenger = Arc::new(FakeMessenger {
            fail_replies: true,
            ..FakeMessenger::default()
        });
        let mut cmd = HelpCommand::default();
        cmd.init(context(messenger, Arc::new(MemoryStore::new()), json!([])));

        let err = cmd.run(&message("1", "!fit help")).await.unwrap_err();
        assert!(matches!(err, Error::External(m) if m == "discord is down"));
    }

    #[tokio::test]
    async fn fails_before_init() {
        let cmd = HelpCommand::default();
        assert!(matches!(
            cmd.run(&message("1", "!fit help")).await,
            Err(Error::Config(_))
        ));
    }
}
