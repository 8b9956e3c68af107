use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::CharacterId,
    eve::{CharacterData, OAuthCredential},
    Result,
};

/// Where registration links point to (`{protocol}://{hostname}/register/...`).
pub trait SiteConfig: Send + Sync {
    fn local_protocol(&self) -> &str;
    fn local_hostname(&self) -> &str;
}

/// Hexagonal port for the key-value store records are persisted in.
///
/// `get`/`set` act on the in-memory document and never block on I/O; `save` flushes the
/// whole document to durable storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    async fn save(&self) -> Result<()>;
}

/// Hexagonal port for the EVE character-data API.
#[async_trait]
pub trait CharacterApi: Send + Sync {
    /// Resolve the character an access token was issued for.
    async fn get_character_data(&self, access_token: &str) -> Result<CharacterData>;

    /// Fetch the raw fitting list JSON of a character.
    async fn get_char_fits(
        &self,
        oauth: &OAuthCredential,
        character_id: CharacterId,
    ) -> Result<Value>;
}

/// Hexagonal port for the EVE single sign-on authorization-code flow.
#[async_trait]
pub trait SsoClient: Send + Sync {
    /// URL the user is sent to; `state` comes back untouched on the callback.
    fn authorize_url(&self, state: &str) -> Result<String>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthCredential>;
}
