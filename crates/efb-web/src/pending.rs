//! SSO round-trips in flight, keyed by the one-time `state` token sent to SSO.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use efb_core::{crypto, domain::DiscordId};
use tokio::sync::Mutex;

const STATE_TOKEN_BYTES: usize = 16;

struct Pending {
    discord_id: DiscordId,
    created: Instant,
}

pub struct PendingLogins {
    ttl: Duration,
    inner: Mutex<HashMap<String, Pending>>,
}

impl Default for PendingLogins {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl PendingLogins {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Start a round-trip for `discord_id` and return its state token.
    pub async fn begin(&self, discord_id: DiscordId) -> String {
        let token = crypto::random_hex(STATE_TOKEN_BYTES);
        let mut map = self.inner.lock().await;
        map.retain(|_, p| p.created.elapsed() < self.ttl);
        map.insert(
            token.clone(),
            Pending {
                discord_id,
                created: Instant::now(),
            },
        );
        token
    }

    /// Finish the round-trip `token` belongs to. A token works once and not after the TTL.
    pub async fn take(&self, token: &str) -> Option<DiscordId> {
        let pending = self.inner.lock().await.remove(token)?;
        (pending.created.elapsed() < self.ttl).then_some(pending.discord_id)
    }

    pub async fn in_flight(&self) -> usize {
        self.inner.lock().await.len()
    }
}
