// handlers/public/auth/logout.rs - GET /auth/logout handler

use axum::{extract::State, response::Response};
use axum_extra::extract::SignedCookieJar;

use crate::context::AppContext;
use crate::middleware::found;
use crate::session::cookie;

/// GET /auth/logout - Destroy the session and return to `/`
pub async fn logout_get(State(ctx): State<AppContext>, jar: SignedCookieJar) -> (SignedCookieJar, Response) {
    if let Some(session_id) = cookie::read_session_id(&jar, ctx.cookie_name()) {
        if ctx.sessions.remove(&session_id).await {
            tracing::info!(%session_id, "session destroyed");
        }
    }

    let jar = jar.remove(cookie::clear_session_cookie(ctx.cookie_name()));
    (jar, found("/"))
}
