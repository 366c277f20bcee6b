// handlers/protected/servers.rs - GET /servers handler

use axum::{
    extract::{Extension, Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::context::AppContext;
use crate::discord::probe_all;
use crate::error::ApiError;
use crate::middleware::AuthenticatedOperator;
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct ServersQuery {
    /// Re-fetch memberships from Discord instead of using the cached list.
    #[serde(default)]
    pub refresh: bool,
}

/// GET /servers - Manageable guilds annotated with bot install status
///
/// Every render re-probes each guild; statuses are never cached.
pub async fn servers_get(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthenticatedOperator>,
    Query(query): Query<ServersQuery>,
) -> Result<Html<String>, ApiError> {
    let AuthenticatedOperator { session_id, mut operator } = auth;

    if query.refresh {
        let memberships = ctx.identity.fetch_memberships(operator.access_token()).await?;
        let refreshed = memberships.clone();
        let cleared = ctx
            .sessions
            .update(session_id, move |session| session.refresh_memberships(refreshed))
            .await?;
        if cleared {
            tracing::info!(%session_id, "selected guild no longer manageable, selection cleared");
        }
        operator.memberships = memberships;
    }

    let entries = probe_all(ctx.prober.as_ref(), operator.manageable_tenants()).await;
    tracing::debug!(
        operator = %operator.identity.id,
        guilds = entries.len(),
        "rendering server list"
    );

    Ok(Html(views::server_list(&entries)))
}
