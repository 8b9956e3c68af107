use std::sync::Arc;

use efb_core::{
    ports::{CharacterApi, KeyValueStore, SiteConfig, SsoClient},
    user::User,
};

use crate::pending::PendingLogins;

/// Shared state of the registration server.
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub api: Arc<dyn CharacterApi>,
    pub site: Arc<dyn SiteConfig>,
    pub sso: Arc<dyn SsoClient>,
    pub pending: PendingLogins,
}

impl AppState {
    /// Empty user record wired to the server's store and API.
    pub fn user(&self) -> User {
        User::new(self.store.clone(), self.api.clone(), self.site.clone())
    }
}
