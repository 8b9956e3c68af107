use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    bot::BotContext,
    eve::{parse_fittings, Fitting},
    formatting::escape_markdown,
    messaging::types::IncomingMessage,
    Result,
};

use super::{author_record, bound, send_register_link, Command};

/// Lists the saved fittings of the author's linked character.
#[derive(Default)]
pub struct ListCommand {
    bot: Option<Arc<BotContext>>,
}

#[async_trait]
impl Command for ListCommand {
    fn init(&mut self, bot: Arc<BotContext>) -> &'static str {
        self.bot = Some(bot);
        "list"
    }

    async fn run(&self, message: &IncomingMessage) -> Result<()> {
        let bot = bound(&self.bot)?;
        let mut user = author_record(bot, message)?;
        if !user.is_authenticated() {
            return send_register_link(bot, message, &mut user).await;
        }

        let fits = parse_fittings(&user.get_all_fits().await?)?;
        let owner = user.data().eve_name.as_deref().unwrap_or("your character");
        bot.reply(message, &render_list(owner, &fits)).await
    }
}

fn render_list(owner: &str, fits: &[Fitting]) -> String {
    let owner = escape_markdown(owner);
    if fits.is_empty() {
        return format!("No fittings saved for {owner}.");
    }

    let mut lines = vec![format!("**Fittings of {owner}** ({})", fits.len())];
    lines.extend(fits.iter().map(|fit| {
        format!(
            "`{}` {} ({})",
            fit.fitting_id,
            escape_markdown(&fit.name),
            escape_markdown(&fit.ship.name)
        )
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::testing::{context, message, FakeMessenger},
        domain::DiscordId,
        ports::KeyValueStore,
        store::MemoryStore,
    };
    use serde_json::json;

    fn linked_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set(
            "users.1",
            json!({
                "discordId": "1",
                "eveId": 42,
                "eveName": "Foo",
                "oauth": {"access_token": "tok"}
            }),
        );
        store
    }

    fn fits() -> serde_json::Value {
        json!({"items": [
            {"fittingID": 7, "name": "Tackle", "ship": {"id": 587, "name": "Rifter"}},
            {"fittingID": 9, "name": "Salvage_Run", "ship": {"id": 11132, "name": "Noctis"}}
        ]})
    }

    #[tokio::test]
    async fn lists_fits_of_linked_character() {
        let messenger = Arc::new(FakeMessenger::default());
        let mut cmd = ListCommand::default();
        cmd.init(context(messenger.clone(), linked_store(), fits()));

        cmd.run(&message("1", "!fit list")).await.unwrap();

        assert_eq!(
            messenger.replies(),
            vec!["**Fittings of Foo** (2)\n`7` Tackle (Rifter)\n`9` Salvage\\_Run (Noctis)"
                .to_string()]
        );
    }

    #[tokio::test]
    async fn empty_list_says_so() {
        let messenger = Arc::new(FakeMessenger::default());
        let mut cmd = ListCommand::default();
        cmd.init(context(messenger.clone(), linked_store(), json!({"items": []})));

        cmd.run(&message("1", "!fit list")).await.unwrap();

        assert_eq!(
            messenger.replies(),
            vec!["No fittings saved for Foo.".to_string()]
        );
    }

    #[tokio::test]
    async fn unlinked_author_gets_registration_link_in_private() {
        let messenger = Arc::new(FakeMessenger::default());
        let store = Arc::new(MemoryStore::new());
        let mut cmd = ListCommand::default();
        cmd.init(context(messenger.clone(), store.clone(), fits()));

        cmd.run(&message("5", "!fit list")).await.unwrap();

        let directs = messenger.directs();
        assert_eq!(directs.len(), 1);
        assert_eq!(directs[0].0, DiscordId("5".to_string()));
        assert!(directs[0]
            .1
            .contains("https://fits.example.org/register/?discordId=5&verifCode="));
        assert_eq!(messenger.replies().len(), 1);
        assert!(messenger.replies()[0].contains("direct message"));

        // The code in the link is the one now pending in the store.
        let code = store.get("users.5").unwrap()["verifCode"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(directs[0].1.ends_with(&code));
    }
}
