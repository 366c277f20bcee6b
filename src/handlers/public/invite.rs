// handlers/public/invite.rs - GET /invite/:guild_id handler

use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::context::AppContext;
use crate::discord::oauth;
use crate::error::ApiError;
use crate::middleware::found;

/// GET /invite/:guild_id - Redirect to the bot install screen for one guild
pub async fn invite_get(State(ctx): State<AppContext>, Path(guild_id): Path<String>) -> Result<Response, ApiError> {
    let url = oauth::invite_url(&ctx.config.discord, &guild_id)?;
    tracing::info!(guild_id = %guild_id, "bot invite requested");
    Ok(found(&url))
}
