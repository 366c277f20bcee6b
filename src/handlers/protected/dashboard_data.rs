// handlers/protected/dashboard_data.rs - GET /api/dashboard-data handler

use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::discord::probe_all;
use crate::middleware::{ApiResponse, ApiResult, AuthenticatedOperator};
use crate::store::GuildSettings;

/// GET /api/dashboard-data - Session snapshot for the static shell
///
/// Operator, manageable guilds with install status and the selected guild.
/// Settings and categories are included only once a guild is selected.
pub async fn dashboard_data_get(
    State(ctx): State<AppContext>,
    Extension(auth): Extension<AuthenticatedOperator>,
) -> ApiResult<Value> {
    let operator = &auth.operator;
    let entries = probe_all(ctx.prober.as_ref(), operator.manageable_tenants()).await;

    let guilds: Vec<Value> = entries
        .iter()
        .map(|(membership, status)| {
            json!({
                "id": membership.id,
                "name": membership.name,
                "status": status,
            })
        })
        .collect();

    let mut data = json!({
        "operator": {
            "id": operator.identity.id,
            "name": operator.identity.display_name(),
            "tag": operator.identity.tag(),
        },
        "guilds": guilds,
        "selectedGuild": operator.selected_tenant(),
    });

    if let Some(guild_id) = operator.selected_tenant() {
        let settings = ctx
            .store
            .get_guild_settings(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::defaults_for(guild_id));
        let categories = ctx.store.list_categories(guild_id).await?;
        data["settings"] = json!(settings);
        data["categories"] = json!(categories);
    }

    Ok(ApiResponse::success(data))
}
