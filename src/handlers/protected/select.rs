// handlers/protected/select.rs - GET /select/:guild_id handler

use axum::{
    extract::{Extension, Path, State},
    response::Response,
};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::middleware::{found, AuthenticatedOperator};
use crate::session::SessionError;

/// GET /select/:guild_id - Scope the session to one guild
///
/// The id must be one of the session's cached memberships with the manage
/// bit; anything else is a `403` and the session keeps its previous scope.
pub async fn select_get(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthenticatedOperator>,
    Path(guild_id): Path<String>,
) -> Result<Response, ApiError> {
    let session_id = auth.session_id;
    let result = ctx
        .sessions
        .update(session_id, |session| session.select_tenant(&guild_id))
        .await;

    match result {
        Ok(()) => {
            tracing::info!(%session_id, operator = %auth.operator.identity.id, guild_id = %guild_id, "guild selected");
            Ok(found("/dashboard"))
        }
        Err(e @ SessionError::TenantNotManageable(_)) => {
            tracing::warn!(%session_id, operator = %auth.operator.identity.id, guild_id = %guild_id, "rejected guild selection");
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
