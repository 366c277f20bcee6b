// handlers/scoped/settings.rs - POST /save-settings handler

use axum::{
    extract::{Extension, State},
    response::Response,
    Form,
};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::middleware::{found, ScopedTenant};

use super::forms::SettingsForm;

/// POST /save-settings - Upsert the selected guild's settings
pub async fn save_settings_post(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
    Form(form): Form<SettingsForm>,
) -> Result<Response, ApiError> {
    let settings = form.into_settings(&scope.tenant_id)?;
    ctx.store.upsert_guild_settings(&settings).await?;

    tracing::info!(guild_id = %scope.tenant_id, operator = %scope.operator.identity.id, "settings saved");
    Ok(found("/dashboard"))
}
