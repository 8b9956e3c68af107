use std::{
    env, io,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::warn;

use crate::{errors::Error, ports::SiteConfig, Result};

/// Typed configuration for the bot, the registration server and the EVE clients.
#[derive(Clone, Debug)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub msg_prefix: String,

    // Registration links / web server
    pub local_protocol: String,
    pub local_hostname: String,
    pub http_bind: SocketAddr,

    // Storage
    pub db_file: PathBuf,

    // EVE SSO / CREST
    pub eve_client_id: String,
    pub eve_secret_key: String,
    pub eve_callback_url: String,
    pub eve_sso_url: String,
    pub eve_crest_url: String,
    pub http_timeout: Duration,
}

impl Config {
    /// Load from the process environment, reading `./.env` first if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build from an arbitrary key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let discord_token = required(&get, "DISCORD_TOKEN")?;
        let eve_client_id = required(&get, "EVE_CLIENT_ID")?;
        let eve_secret_key = required(&get, "EVE_SECRET_KEY")?;

        let msg_prefix = get("MSG_PREFIX").unwrap_or_else(|| "!fit".to_string());

        let local_protocol = get("LOCAL_PROTOCOL")
            .map(|p| p.trim_end_matches(['/', ':']).to_string())
            .unwrap_or_else(|| "http".to_string());
        let local_hostname = get("LOCAL_HOSTNAME").unwrap_or_else(|| "localhost:8080".to_string());

        let http_bind = get("HTTP_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let http_bind = http_bind
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("HTTP_BIND is not a socket address: {e}")))?;

        let db_file = PathBuf::from(get("DB_FILE").unwrap_or_else(|| "./data/db.json".to_string()));

        let eve_callback_url = get("EVE_CALLBACK_URL")
            .unwrap_or_else(|| format!("{local_protocol}://{local_hostname}/callback/"));
        let eve_sso_url = trim_base_url(
            get("EVE_SSO_URL").unwrap_or_else(|| "https://login.eveonline.com".to_string()),
        );
        let eve_crest_url = trim_base_url(
            get("EVE_CREST_URL").unwrap_or_else(|| "https://crest-tq.eveonline.com".to_string()),
        );

        let http_timeout = Duration::from_millis(
            get("HTTP_TIMEOUT_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(10_000),
        );

        Ok(Self {
            discord_token,
            msg_prefix,
            local_protocol,
            local_hostname,
            http_bind,
            db_file,
            eve_client_id,
            eve_secret_key,
            eve_callback_url,
            eve_sso_url,
            eve_crest_url,
            http_timeout,
        })
    }
}

impl SiteConfig for Config {
    fn local_protocol(&self) -> &str {
        &self.local_protocol
    }

    fn local_hostname(&self) -> &str {
        &self.local_hostname
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key).ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Export the variables of a `.env` file. Variables already set in the environment win.
fn load_dotenv_if_present(path: &Path) {
    match dotenv::from_path(path) {
        Ok(()) => {}
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable .env file"),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
