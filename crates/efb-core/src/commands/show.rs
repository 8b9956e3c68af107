use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;

use crate::{
    bot::BotContext,
    eve::{parse_fittings, Fitting, Slot},
    formatting::escape_markdown,
    messaging::types::IncomingMessage,
    Result,
};

use super::{author_record, bound, send_register_link, Command};

/// Shows the modules of one fitting, by `fittingID`.
#[derive(Default)]
pub struct ShowCommand {
    bot: Option<Arc<BotContext>>,
}

#[async_trait]
impl Command for ShowCommand {
    fn init(&mut self, bot: Arc<BotContext>) -> &'static str {
        self.bot = Some(bot);
        "show"
    }

    async fn run(&self, message: &IncomingMessage) -> Result<()> {
        let bot = bound(&self.bot)?;
        let Ok(fit_id) = bot.command_args(message).parse::<i64>() else {
            let usage = format!(
                "Usage: `{} show <id>` - return fit contents by @id.",
                bot.msg_prefix
            );
            return bot.reply(message, &usage).await;
        };

        let mut user = author_record(bot, message)?;
        if !user.is_authenticated() {
            return send_register_link(bot, message, &mut user).await;
        }

        let fits = parse_fittings(&user.get_all_fits().await?)?;
        let text = match fits.iter().find(|f| f.fitting_id == fit_id) {
            Some(fit) => render_fit(fit),
            None => format!("No fit with id {fit_id}."),
        };
        bot.reply(message, &text).await
    }
}

fn render_fit(fit: &Fitting) -> String {
    let mut lines = vec![format!(
        "**{}** - {}",
        escape_markdown(&fit.name),
        escape_markdown(&fit.ship.name)
    )];
    if !fit.description.trim().is_empty() {
        lines.push(format!("_{}_", escape_markdown(fit.description.trim())));
    }

    // Same module in the same slot group is collapsed into one line.
    let mut groups: BTreeMap<Slot, Vec<(&str, i64)>> = BTreeMap::new();
    for item in &fit.items {
        let group = groups.entry(Slot::from_flag(item.flag)).or_default();
        match group
            .iter_mut()
            .find(|(name, _)| *name == item.item_type.name)
        {
            Some((_, qty)) => *qty += item.quantity,
            None => group.push((item.item_type.name.as_str(), item.quantity)),
        }
    }

    for (slot, items) in groups {
        lines.push(String::new());
        lines.push(format!("{}:", slot.label()));
        lines.extend(
            items
                .into_iter()
                .map(|(name, qty)| format!("{qty}x {}", escape_markdown(name))),
        );
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::testing::{context, message, FakeMessenger},
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
        json!({"items": [{
            "fittingID": 7,
            "name": "Tackle",
            "description": "fast tackle",
            "ship": {"id": 587, "name": "Rifter"},
            "items": [
                {"type": {"id": 2873, "name": "125mm Gatling AutoCannon I"}, "flag": 27, "quantity": 1},
                {"type": {"id": 2873, "name": "125mm Gatling AutoCannon I"}, "flag": 28, "quantity": 1},
                {"type": {"id": 3831, "name": "Warp Scrambler I"}, "flag": 19, "quantity": 1},
                {"type": {"id": 2046, "name": "Damage Control I"}, "flag": 11, "quantity": 1},
                {"type": {"id": 193, "name": "EMP S"}, "flag": 5, "quantity": 400}
            ]
        }]})
    }

    async fn run_show(content: &str, store: Arc<MemoryStore>) -> Arc<FakeMessenger> {
        let messenger = Arc::new(FakeMessenger::default());
        let mut cmd = ShowCommand::default();
        cmd.init(context(messenger.clone(), store, fits()));
        cmd.run(&message("1", content)).await.unwrap();
        messenger
    }

    #[tokio::test]
    async fn renders_fit_grouped_by_slot() {
        let messenger = run_show("!fit show 7", linked_store()).await;

        assert_eq!(
            messenger.replies(),
            vec![[
                "**Tackle** - Rifter",
                "_fast tackle_",
                "",
                "High slots:",
                "2x 125mm Gatling AutoCannon I",
                "",
                "Mid slots:",
                "1x Warp Scrambler I",
                "",
                "Low slots:",
                "1x Damage Control I",
                "",
                "Cargo:",
                "400x EMP S",
            ]
            .join("\n")]
        );
    }

    #[tokio::test]
    async fn unknown_id() {
        let messenger = run_show("!fit show 8", linked_store()).await;
        assert_eq!(messenger.replies(), vec!["No fit with id 8.".to_string()]);
    }

    #[tokio::test]
    async fn missing_or_bad_id_shows_usage() {
        for content in ["!fit show", "!fit show abc"] {
            let messenger = run_show(content, linked_store()).await;
            assert_eq!(
                messenger.replies(),
                vec!["Usage: `!fit show <id>` - return fit contents by @id.".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn unlinked_author_gets_registration_link() {
        let messenger = run_show("!fit show 7", Arc::new(MemoryStore::new())).await;
        assert_eq!(messenger.directs().len(), 1);
        assert_eq!(messenger.replies().len(), 1);
    }
}
