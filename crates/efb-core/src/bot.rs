//! Bot runtime shell: command registry, prefix parsing and dispatch.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, warn};

use crate::{
    commands::{Command, HelpCommand, ListCommand, PingCommand, ShowCommand},
    formatting::split_message,
    messaging::{port::MessagingPort, types::IncomingMessage},
    ports::{CharacterApi, KeyValueStore, SiteConfig},
    user::User,
    Result,
};

const GENERIC_FAILURE: &str = "Something went wrong, please try again later.";

/// Everything a command may reach: the chat client, the prefix and the user-record
/// collaborators.
pub struct BotContext {
    pub messenger: Arc<dyn MessagingPort>,
    pub msg_prefix: String,
    pub store: Arc<dyn KeyValueStore>,
    pub api: Arc<dyn CharacterApi>,
    pub site: Arc<dyn SiteConfig>,
}

impl BotContext {
    /// Empty user record wired to the bot's store and API.
    pub fn user(&self) -> User {
        User::new(self.store.clone(), self.api.clone(), self.site.clone())
    }

    /// Reply to `to`, splitting text above the messenger's length limit.
    pub async fn reply(&self, to: &IncomingMessage, text: &str) -> Result<()> {
        let limit = self.messenger.capabilities().max_message_len;
        for chunk in split_message(text, limit) {
            self.messenger.reply(to, &chunk).await?;
        }
        Ok(())
    }

    /// Arguments following the command name, or `""`.
    pub fn command_args<'a>(&self, message: &'a IncomingMessage) -> &'a str {
        parse_command(&self.msg_prefix, &message.content)
            .map(|(_, args)| args)
            .unwrap_or("")
    }
}

pub struct Bot {
    ctx: Arc<BotContext>,
    commands: HashMap<String, Box<dyn Command>>,
}

impl Bot {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self {
            ctx,
            commands: HashMap::new(),
        }
    }

    /// Bot with `help`, `ping`, `list` and `show` registered.
    pub fn with_default_commands(ctx: Arc<BotContext>) -> Self {
        let mut bot = Self::new(ctx);
        bot.register(Box::<HelpCommand>::default());
        bot.register(Box::<PingCommand>::default());
        bot.register(Box::<ListCommand>::default());
        bot.register(Box::<ShowCommand>::default());
        bot
    }

    /// Initialise `command` and index it under the name it reports.
    pub fn register(&mut self, mut command: Box<dyn Command>) -> &'static str {
        let name = command.init(self.ctx.clone());
        if self.commands.insert(name.to_string(), command).is_some() {
            warn!(command = name, "command registered twice, keeping the latest");
        }
        name
    }

    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route one chat message. Failures are logged and reported back in the channel.
    pub async fn handle(&self, message: &IncomingMessage) {
        if message.author_is_bot {
            return;
        }
        let Some((name, _)) = parse_command(&self.ctx.msg_prefix, &message.content) else {
            return;
        };
        debug!(
            command = %name,
            author = %message.author_id,
            author_name = %message.author_name,
            "dispatching command"
        );

        let Some(command) = self.commands.get(&name) else {
            let text = format!(
                "Unknown command `{name}`. Try `{} help`.",
                self.ctx.msg_prefix
            );
            if let Err(e) = self.ctx.reply(message, &text).await {
                warn!(error = %e, "failed to reply to unknown command");
            }
            return;
        };

        if let Err(e) = command.run(message).await {
            warn!(command = %name, author = %message.author_id, error = %e, "command failed");
            let text = e.user_message().unwrap_or(GENERIC_FAILURE);
            if let Err(e) = self.ctx.reply(message, text).await {
                warn!(command = %name, error = %e, "failed to report command failure");
            }
        }
    }
}

/// Split `<prefix> <name> <args...>` into a lowercase command name and the raw arguments.
///
/// The prefix must be followed by whitespace or end the message; the prefix alone means
/// `help`.
pub fn parse_command<'a>(prefix: &str, content: &'a str) -> Option<(String, &'a str)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_lowercase();
    let args = parts.next().unwrap_or("").trim();

    if name.is_empty() {
        return Some(("help".to_string(), ""));
    }
    Some((name, args))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::{errors::Error, store::MemoryStore};
    use async_trait::async_trait;
    use serde_json::json;

    #[test]
    fn parses_prefixed_commands() {
        assert_eq!(
            parse_command("!fit", "!fit show 42"),
            Some(("show".to_string(), "42"))
        );
        assert_eq!(
            parse_command("!fit", "  !fit   LIST  "),
            Some(("list".to_string(), ""))
        );
        assert_eq!(
            parse_command("!fit", "!fit"),
            Some(("help".to_string(), ""))
        );
        assert_eq!(parse_command("!fit", "!fitting list"), None);
        assert_eq!(parse_command("!fit", "hello !fit list"), None);
    }

    #[test]
    fn registers_commands_under_reported_names() {
        let messenger = Arc::new(FakeMessenger::default());
        let bot = Bot::with_default_commands(context(
            messenger,
            Arc::new(MemoryStore::new()),
            json!([]),
        ));
        assert_eq!(bot.command_names(), vec!["help", "list", "ping", "show"]);
    }

    #[tokio::test]
    async fn dispatches_by_name() {
        let messenger = Arc::new(FakeMessenger::default());
        let bot = Bot::with_default_commands(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));

        bot.handle(&message("1", "!fit ping")).await;
        bot.handle(&message("1", "just chatting")).await;

        assert_eq!(messenger.replies(), vec!["pong".to_string()]);
    }

    #[tokio::test]
    async fn ignores_bots() {
        let messenger = Arc::new(FakeMessenger::default());
        let bot = Bot::with_default_commands(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));

        let mut msg = message("1", "!fit ping");
        msg.author_is_bot = true;
        bot.handle(&msg).await;

        assert!(messenger.replies().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_points_to_help() {
        let messenger = Arc::new(FakeMessenger::default());
        let bot = Bot::with_default_commands(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));

        bot.handle(&message("1", "!fit fly")).await;

        assert_eq!(
            messenger.replies(),
            vec!["Unknown command `fly`. Try `!fit help`.".to_string()]
        );
    }

    struct Failing(fn() -> Error);

    #[async_trait]
    impl Command for Failing {
        fn init(&mut self, _bot: Arc<BotContext>) -> &'static str {
            "fail"
        }

        async fn run(&self, _message: &IncomingMessage) -> Result<()> {
            Err((self.0)())
        }
    }

    #[tokio::test]
    async fn reports_failures_without_leaking_internals() {
        let messenger = Arc::new(FakeMessenger::default());
        let mut bot = Bot::new(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));
        bot.register(Box::new(Failing(|| {
            Error::External("crest 502 at /characters/1/".to_string())
        })));

        bot.handle(&message("1", "!fit fail")).await;

        assert_eq!(messenger.replies(), vec![GENERIC_FAILURE.to_string()]);
    }

    #[tokio::test]
    async fn reports_user_facing_failures_verbatim() {
        let messenger = Arc::new(FakeMessenger::default());
        let mut bot = Bot::new(context(
            messenger.clone(),
            Arc::new(MemoryStore::new()),
            json!([]),
        ));
        bot.register(Box::new(Failing(Error::invalid_code)));

        bot.handle(&message("1", "!fit fail")).await;

        assert_eq!(
            messenger.replies(),
            vec!["Verification code is invalid.".to_string()]
        );
    }

    #[tokio::test]
    async fn long_replies_are_split() {
        let messenger = Arc::new(FakeMessenger {
            max_len: Some(10),
            ..FakeMessenger::default()
        });
        let ctx = context(messenger.clone(), Arc::new(MemoryStore::new()), json!([]));

        ctx.reply(&message("1", "x"), "line one\nline two")
            .await
            .unwrap();

        assert_eq!(
            messenger.replies(),
            vec!["line one".to_string(), "line two".to_string()]
        );
    }
}
