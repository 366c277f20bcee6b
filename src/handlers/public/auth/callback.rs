// handlers/public/auth/callback.rs - GET /auth/callback handler

use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::context::AppContext;
use crate::discord::DiscordError;
use crate::error::ApiError;
use crate::session::cookie;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// GET /auth/callback?code&state - Finish the operator OAuth flow
///
/// Order matters:
/// 1. `state` must match the pending token, else `400` with the session untouched
/// 2. the client secret must be configured
/// 3. the token is consumed before any upstream call, so a replay always fails
/// 4. exchange, identity and memberships; any upstream failure is a `400`
pub async fn callback_get(
    State(ctx): State<AppContext>,
    jar: SignedCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Html<String>, ApiError> {
    let session_id = cookie::read_session_id(&jar, ctx.cookie_name());
    let (Some(session_id), Some(code), Some(state)) = (session_id, present(query.code), present(query.state)) else {
        tracing::warn!("OAuth callback without session, code or state");
        return Err(ApiError::OAuthState);
    };

    if let Err(e) = ctx.sessions.get(&session_id).await.verify_oauth_state(&state) {
        tracing::warn!(%session_id, "OAuth state mismatch");
        return Err(e.into());
    }

    if ctx.config.discord.client_secret.is_none() {
        return Err(DiscordError::ConfigMissing("DISCORD_CLIENT_SECRET").into());
    }

    ctx.sessions
        .update(session_id, |session| session.consume_oauth_state(&state))
        .await?;

    let grant = ctx.identity.exchange_code(&code).await?;
    let identity = ctx.identity.fetch_identity(&grant.access_token).await?;
    let memberships = ctx.identity.fetch_memberships(&grant.access_token).await?;

    let html = views::login_success(&identity, &memberships);
    tracing::info!(
        %session_id,
        operator = %identity.id,
        guilds = memberships.len(),
        "operator authenticated"
    );

    ctx.sessions
        .update(session_id, move |session| {
            session.authenticate(grant.access_token, identity, memberships)
        })
        .await;

    Ok(Html(html))
}
