use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect},
};
use efb_core::{domain::DiscordId, formatting::escape_html};
use serde::Deserialize;
use tracing::info;

use crate::{error::WebError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterQuery {
    pub discord_id: Option<String>,
    pub verif_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

fn required(value: Option<String>, name: &'static str) -> Result<String, WebError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(WebError::MissingParameter(name))
}

/// Registration link handler
///
/// GET /register/?discordId=..&verifCode=..
///
/// Consumes the verification code and redirects to EVE SSO with a one-time state token
/// bound to the Discord account.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegisterQuery>,
) -> Result<Redirect, WebError> {
    let discord_id = required(query.discord_id, "discordId")?;
    let code = required(query.verif_code, "verifCode")?;

    let mut user = state.user();
    user.load_discord_id(&discord_id)?;
    user.check_register_link(&code)?;
    user.save().await?;

    let token = state.pending.begin(DiscordId(discord_id.clone())).await;
    let in_flight = state.pending.in_flight().await;
    info!(
        discord_id = %discord_id,
        in_flight,
        "registration link used, redirecting to sso"
    );
    Ok(Redirect::to(&state.sso.authorize_url(&token)?))
}

/// SSO callback handler
///
/// GET /callback/?code=..&state=..
pub async fn callback_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Html<String>, WebError> {
    let code = required(query.code, "code")?;
    let token = required(query.state, "state")?;

    let discord_id = state
        .pending
        .take(&token)
        .await
        .ok_or(WebError::UnknownState)?;

    let oauth = state.sso.exchange_code(&code).await?;
    let mut user = state.user();
    user.load_discord_id(&discord_id.0)?;
    user.init_eve(oauth).await?;

    let name = user.data().eve_name.clone().unwrap_or_default();
    info!(discord_id = %discord_id, character = %name, "character linked");
    Ok(Html(format!(
        "<!doctype html>\n<title>EVE Fitting Bot</title>\n\
         <p><b>{}</b> is now linked to your Discord account. You can close this page.</p>\n",
        escape_html(&name)
    )))
}

/// Health check handler
///
/// GET /health
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}
