// handlers/scoped/panels.rs - POST /post-panel and /post-panelset handlers

use axum::{
    extract::{Extension, State},
    response::Response,
    Form,
};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::middleware::{found, ScopedTenant};
use crate::panels;
use crate::store::GuildSettings;

use super::forms::PanelForm;

/// POST /post-panel - Post the staff settings panel (page 1) to a channel
pub async fn post_panel_post(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
    Form(form): Form<PanelForm>,
) -> Result<Response, ApiError> {
    let channel_id = form.channel_id()?;

    let settings = ctx
        .store
        .get_guild_settings(&scope.tenant_id)
        .await?
        .unwrap_or_else(|| GuildSettings::defaults_for(scope.tenant_id.as_str()));
    let categories = ctx.store.list_categories(&scope.tenant_id).await?;

    let payload = panels::render_settings_panel(&settings, &categories, 1);
    ctx.messaging.send_channel_message(channel_id, &payload).await?;

    tracing::info!(guild_id = %scope.tenant_id, channel_id, "settings panel posted");
    Ok(found("/dashboard"))
}

/// POST /post-panelset - Post the public ticket-opening panel to a channel
pub async fn post_panelset_post(
    State(ctx): State<AppContext>,
    Extension(scope): Extension<ScopedTenant>,
    Form(form): Form<PanelForm>,
) -> Result<Response, ApiError> {
    let channel_id = form.channel_id()?;

    let categories = ctx.store.list_categories(&scope.tenant_id).await?;
    let payload = panels::render_open_panel(&categories);
    ctx.messaging.send_channel_message(channel_id, &payload).await?;

    tracing::info!(guild_id = %scope.tenant_id, channel_id, "ticket panel posted");
    Ok(found("/dashboard"))
}
