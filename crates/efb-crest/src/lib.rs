//! EVE SSO and CREST adapter.
//!
//! Implements [`SsoClient`] (authorization-code flow) and [`CharacterApi`] (token verify,
//! fitting list) over HTTPS.

use std::time::Duration;

use async_trait::async_trait;
use efb_core::{
    config::Config,
    domain::CharacterId,
    errors::Error,
    eve::{CharacterData, OAuthCredential},
    ports::{CharacterApi, SsoClient},
    Result,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Scope needed to read saved fittings.
pub const FITTINGS_SCOPE: &str = "characterFittingsRead";

const USER_AGENT: &str = concat!("efb/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct CrestConfig {
    pub sso_base_url: String,
    pub crest_base_url: String,
    pub client_id: String,
    pub secret_key: String,
    pub callback_url: String,
    pub timeout: Duration,
}

impl CrestConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            sso_base_url: cfg.eve_sso_url.trim_end_matches('/').to_string(),
            crest_base_url: cfg.eve_crest_url.trim_end_matches('/').to_string(),
            client_id: cfg.eve_client_id.clone(),
            secret_key: cfg.eve_secret_key.clone(),
            callback_url: cfg.eve_callback_url.clone(),
            timeout: cfg.http_timeout,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CrestClient {
    cfg: CrestConfig,
    http: reqwest::Client,
}

impl CrestClient {
    pub fn new(cfg: CrestConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;
        Ok(Self { cfg, http })
    }

    async fn read_json<T: DeserializeOwned>(
        what: &str,
        resp: std::result::Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T> {
        let resp = resp.map_err(|e| Error::External(format!("{what} request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "{what} failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::External(format!("{what} json error: {e}")))
    }
}

#[async_trait]
impl SsoClient for CrestClient {
    fn authorize_url(&self, state: &str) -> Result<String> {
        let query = serde_urlencoded::to_string([
            ("response_type", "code"),
            ("redirect_uri", self.cfg.callback_url.as_str()),
            ("client_id", self.cfg.client_id.as_str()),
            ("scope", FITTINGS_SCOPE),
            ("state", state),
        ])
        .map_err(|e| Error::External(format!("cannot encode sso authorize url: {e}")))?;
        Ok(format!("{}/oauth/authorize/?{query}", self.cfg.sso_base_url))
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthCredential> {
        debug!("exchanging sso authorization code");
        let resp = self
            .http
            .post(format!("{}/oauth/token", self.cfg.sso_base_url))
            .basic_auth(&self.cfg.client_id, Some(&self.cfg.secret_key))
            .form(&[("grant_type", "authorization_code"), ("code", code)])
            .send()
            .await;
        Self::read_json("sso token exchange", resp).await
    }
}

#[async_trait]
impl CharacterApi for CrestClient {
    async fn get_character_data(&self, access_token: &str) -> Result<CharacterData> {
        let resp = self
            .http
            .get(format!("{}/oauth/verify", self.cfg.sso_base_url))
            .bearer_auth(access_token)
            .send()
            .await;
        Self::read_json("sso verify", resp).await
    }

    async fn get_char_fits(
        &self,
        oauth: &OAuthCredential,
        character_id: CharacterId,
    ) -> Result<serde_json::Value> {
        debug!(character_id = %character_id, "fetching fittings");
        let resp = self
            .http
            .get(fittings_url(&self.cfg.crest_base_url, character_id))
            .bearer_auth(&oauth.access_token)
            .send()
            .await;
        Self::read_json("crest fittings", resp).await
    }
}

fn fittings_url(crest_base_url: &str, character_id: CharacterId) -> String {
    format!("{crest_base_url}/characters/{character_id}/fittings/")
}
