// handlers/public/auth/login.rs - GET /auth/login handler

use axum::{extract::State, response::Response};
use axum_extra::extract::SignedCookieJar;

use crate::context::AppContext;
use crate::discord::oauth::{self, AuthorizationRequest};
use crate::error::ApiError;
use crate::middleware::found;
use crate::session::{cookie, SessionId};

/// GET /auth/login - Start the operator OAuth flow
///
/// Stores a fresh anti-forgery token in the session (creating the session if
/// needed) and redirects to the provider. `400` when the app id or redirect
/// URI is not configured.
pub async fn login_get(State(ctx): State<AppContext>, jar: SignedCookieJar) -> Result<(SignedCookieJar, Response), ApiError> {
    let AuthorizationRequest { url, state } = oauth::begin_authorization(&ctx.config.discord)?;

    let session_id = cookie::read_session_id(&jar, ctx.cookie_name()).unwrap_or_else(SessionId::generate);
    ctx.sessions.update(session_id, move |session| session.begin_login(state)).await;
    tracing::debug!(%session_id, "login started");

    let jar = jar.add(cookie::session_cookie(
        ctx.cookie_name(),
        session_id,
        ctx.config.session.secure_cookies,
    ));
    Ok((jar, found(&url)))
}
