use std::sync::Arc;

use efb_core::{
    config::Config,
    ports::{CharacterApi, KeyValueStore},
    store::JsonFileStore,
};
use efb_crest::{CrestClient, CrestConfig};
use efb_web::{pending::PendingLogins, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), efb_core::Error> {
    efb_core::logging::init("efb")?;

    let cfg = Arc::new(Config::load()?);
    let db = JsonFileStore::open(&cfg.db_file)?;
    info!(db_file = %db.path().display(), "store opened");
    let store: Arc<dyn KeyValueStore> = Arc::new(db);

    let crest = Arc::new(CrestClient::new(CrestConfig::from_config(&cfg))?);
    let api: Arc<dyn CharacterApi> = crest.clone();

    let web_state = Arc::new(AppState {
        store: store.clone(),
        api: api.clone(),
        site: cfg.clone(),
        sso: crest,
        pending: PendingLogins::default(),
    });
    let web = tokio::spawn(efb_web::serve(cfg.http_bind, web_state));

    tokio::select! {
        res = efb_discord::router::run_gateway(cfg.clone(), store.clone(), api) => {
            res.map_err(|e| efb_core::Error::External(format!("discord bot failed: {e}")))?;
        }
        res = web => {
            res.map_err(|e| efb_core::Error::External(format!("registration server task failed: {e}")))?
                .map_err(|e| efb_core::Error::External(format!("registration server failed: {e:#}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
        }
    }

    // Persist whatever is still only in memory.
    store.save().await
}
