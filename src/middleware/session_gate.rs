use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::SignedCookieJar;

use crate::context::AppContext;
use crate::error::ApiError;
use crate::session::{cookie, OperatorSession, SessionId, SessionState};

/// Operator context injected for routes that need a logged-in operator.
#[derive(Clone, Debug)]
pub struct AuthenticatedOperator {
    pub session_id: SessionId,
    pub operator: OperatorSession,
}

/// Operator plus the selected guild, injected for tenant-scoped routes.
#[derive(Clone, Debug)]
pub struct ScopedTenant {
    pub session_id: SessionId,
    pub operator: OperatorSession,
    pub tenant_id: String,
}

impl ScopedTenant {
    /// Display name of the selected guild, falling back to its id.
    pub fn tenant_name(&self) -> &str {
        self.operator
            .tenant(&self.tenant_id)
            .map(|m| m.name.as_str())
            .unwrap_or(&self.tenant_id)
    }
}

/// Requires an authenticated operator. Anonymous sessions are sent to `/`.
pub async fn require_operator(
    State(ctx): State<AppContext>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = cookie::read_session_id(&jar, ctx.cookie_name()).ok_or(ApiError::NotAuthenticated)?;
    let session = ctx.sessions.get(&session_id).await;

    let operator = match session.state() {
        SessionState::Anonymous => {
            tracing::debug!(%session_id, "no operator in session");
            return Err(ApiError::NotAuthenticated);
        }
        SessionState::Unscoped(operator) | SessionState::Scoped { operator, .. } => operator.clone(),
    };

    request
        .extensions_mut()
        .insert(AuthenticatedOperator { session_id, operator });
    Ok(next.run(request).await)
}

/// Requires an authenticated operator with a selected guild. Anonymous
/// sessions go to `/`, unscoped ones to `/servers`.
pub async fn require_scoped_tenant(
    State(ctx): State<AppContext>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_id = cookie::read_session_id(&jar, ctx.cookie_name()).ok_or(ApiError::NotAuthenticated)?;
    let session = ctx.sessions.get(&session_id).await;

    let scoped = match session.state() {
        SessionState::Anonymous => return Err(ApiError::NotAuthenticated),
        SessionState::Unscoped(_) => {
            tracing::debug!(%session_id, "no guild selected");
            return Err(ApiError::NoTenantSelected);
        }
        SessionState::Scoped { operator, tenant_id } => ScopedTenant {
            session_id,
            operator: operator.clone(),
            tenant_id: tenant_id.to_string(),
        },
    };

    tracing::debug!(tenant_id = %scoped.tenant_id, operator = %scoped.operator.identity.id, "scoped request");
    request.extensions_mut().insert(scoped);
    Ok(next.run(request).await)
}
