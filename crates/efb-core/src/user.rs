//! User record: binds a Discord account to an EVE character and its OAuth credential.
//!
//! A record is addressed in the store by `users.<discordId>`. Linking goes through a
//! one-time verification code carried by the registration link: the link proves the
//! person opening it controls the Discord account, then the SSO callback calls
//! [`User::init_eve`] with the credential it obtained.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    crypto,
    domain::{CharacterId, DiscordId},
    errors::Error,
    eve::OAuthCredential,
    ports::{CharacterApi, KeyValueStore, SiteConfig},
    Result,
};

/// Store namespace user records live under.
pub const USERS_NAMESPACE: &str = "users";

/// Path of the registration endpoint the link points to.
pub const REGISTER_PATH: &str = "/register/";

/// Store key of a user record.
pub fn user_key(discord_id: &DiscordId) -> String {
    format!("{USERS_NAMESPACE}.{discord_id}")
}

/// Persisted shape of a user record. Field names match the JSON written to the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserData {
    /// OAuth data exchanged with EVE SSO.
    pub oauth: Option<OAuthCredential>,
    pub eve_id: Option<CharacterId>,
    pub eve_name: Option<String>,
    pub discord_id: Option<DiscordId>,
    /// Pending registration code; `None` once used.
    pub verif_code: Option<String>,
}

pub struct User {
    data: UserData,
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn CharacterApi>,
    site: Arc<dyn SiteConfig>,
}

impl User {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn CharacterApi>,
        site: Arc<dyn SiteConfig>,
    ) -> Self {
        Self {
            data: UserData::default(),
            store,
            api,
            site,
        }
    }

    pub fn data(&self) -> &UserData {
        &self.data
    }

    /// Point the record at `id` and replace its contents with whatever the store holds
    /// for that id. Anything set on the record before this call is discarded.
    ///
    /// The loaded record always carries `id`, whatever the stored copy says. When the
    /// stored copy cannot be read the record is left as it was.
    pub fn load_discord_id(&mut self, id: &str) -> Result<&mut Self> {
        // Ids are single segments of the dot-delimited store key.
        if id.trim().is_empty() || id.contains('.') {
            return Err(Error::InvalidInput("Invalid Discord ID".to_string()));
        }

        let discord_id = DiscordId(id.to_string());
        let mut data = match self.store.get(&user_key(&discord_id)) {
            Some(stored) => {
                let data: UserData = serde_json::from_value(stored)?;
                debug!(discord_id = %id, "user record loaded");
                data
            }
            None => UserData::default(),
        };
        data.discord_id = Some(discord_id);
        self.data = data;
        Ok(self)
    }

    /// Write the whole record to the store and flush it.
    pub async fn save(&self) -> Result<()> {
        self.write_to_store()?;
        self.store.save().await
    }

    /// Whether the account went through EVE SSO.
    pub fn is_authenticated(&self) -> bool {
        self.data.eve_id.is_some()
    }

    /// Fitting list JSON of the linked character.
    ///
    /// Callers check [`User::is_authenticated`] first; an unlinked record fails without
    /// a remote call.
    pub async fn get_all_fits(&self) -> Result<Value> {
        let (Some(oauth), Some(eve_id)) = (self.data.oauth.as_ref(), self.data.eve_id) else {
            return Err(Error::InvalidInput(
                "No EVE character is linked to this account.".to_string(),
            ));
        };
        self.api.get_char_fits(oauth, eve_id).await
    }

    /// Issue a fresh verification code and return the registration link carrying it.
    ///
    /// The record is written to the store immediately but the flush runs in the
    /// background: the link is handed out before the code reaches disk.
    pub fn get_register_link(&mut self) -> Result<String> {
        let discord_id = self
            .data
            .discord_id
            .clone()
            .ok_or_else(|| Error::InvalidInput("Invalid Discord ID".to_string()))?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::External(format!("cannot schedule store flush: {e}")))?;

        let code = crypto::generate_verification_code();
        self.data.verif_code = Some(code.clone());
        let link = self.register_url(&discord_id, &code)?;

        self.write_to_store()?;
        let store = Arc::clone(&self.store);
        runtime.spawn(async move {
            if let Err(e) = store.save().await {
                warn!(discord_id = %discord_id, error = %e, "failed to persist verification code");
            }
        });

        Ok(link)
    }

    /// Consume the pending verification code if `code` matches it.
    pub fn check_register_link(&mut self, code: &str) -> Result<()> {
        match self.data.verif_code.as_deref() {
            Some(pending) if pending == code => {
                self.data.verif_code = None;
                Ok(())
            }
            _ => Err(Error::invalid_code()),
        }
    }

    /// Link the record to the character `oauth` was issued for and persist it.
    ///
    /// The credential is kept in memory before the lookup; nothing is saved unless the
    /// lookup succeeds.
    pub async fn init_eve(&mut self, oauth: OAuthCredential) -> Result<()> {
        if oauth.access_token.trim().is_empty() {
            return Err(Error::InvalidInput("Invalid OAuth data".to_string()));
        }

        let access_token = oauth.access_token.clone();
        self.data.oauth = Some(oauth);

        let character = self.api.get_character_data(&access_token).await?;
        info!(
            discord_id = ?self.data.discord_id,
            character_id = %character.character_id,
            "linking EVE character"
        );
        self.data.eve_id = Some(character.character_id);
        self.data.eve_name = Some(character.character_name);
        self.save().await
    }

    fn write_to_store(&self) -> Result<()> {
        let discord_id = self
            .data
            .discord_id
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("Invalid Discord ID".to_string()))?;
        self.store
            .set(&user_key(discord_id), serde_json::to_value(&self.data)?);
        Ok(())
    }

    fn register_url(&self, discord_id: &DiscordId, code: &str) -> Result<String> {
        let query = serde_urlencoded::to_string([
            ("discordId", discord_id.0.as_str()),
            ("verifCode", code),
        ])
        .map_err(|e| Error::External(format!("cannot encode registration link: {e}")))?;

        Ok(format!(
            "{}://{}{REGISTER_PATH}?{query}",
            self.site.local_protocol().trim_end_matches(['/', ':']),
            self.site.local_hostname(),
        ))
    }
}
