// handlers/scoped/dashboard.rs - GET /dashboard handler

use axum::{
    extract::{Extension, State},
    response::Html,
};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::middleware::ScopedTenant;
use crate::store::GuildSettings;
use crate::views;

/// GET /dashboard - Settings and category forms for the selected guild
pub async fn dashboard_get(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
) -> Result<Html<String>, ApiError> {
    let settings = ctx
        .store
        .get_guild_settings(&scope.tenant_id)
        .await?
        .unwrap_or_else(|| GuildSettings::defaults_for(scope.tenant_id.as_str()));
    let categories = ctx.store.list_categories(&scope.tenant_id).await?;

    Ok(Html(views::dashboard(
        &scope.tenant_id,
        scope.tenant_name(),
        &settings,
        &categories,
    )))
}
