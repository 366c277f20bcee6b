// handlers/scoped/forms.rs - Form bodies for the tenant-scoped POST routes
//
// Any `guild_id` field a browser sends is ignored: serde drops unknown fields
// and every route takes the guild from the session.

use serde::Deserialize;

use crate::error::ApiError;
use crate::store::GuildSettings;

/// Trimmed value, with blank treated as absent.
fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn int_or(field: &str, value: Option<&str>, default: i32) -> Result<i32, ApiError> {
    match filled(value) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::bad_request(format!("{field} must be a whole number"))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    pub ticket_parent_channel_id: Option<String>,
    pub staff_role_id: Option<String>,
    pub timezone: Option<String>,
    pub category_slots: Option<String>,
    pub warn_threshold: Option<String>,
    pub warn_timeout_minutes: Option<String>,
    pub enable_smart_replies: Option<String>,
    pub enable_ai_suggestions: Option<String>,
    pub enable_auto_priority: Option<String>,
}

impl SettingsForm {
    /// Blank numbers take their defaults, checkboxes are on iff submitted.
    pub fn into_settings(self, guild_id: &str) -> Result<GuildSettings, ApiError> {
        Ok(GuildSettings {
            guild_id: guild_id.to_string(),
            ticket_parent_channel_id: filled(self.ticket_parent_channel_id.as_deref()).map(str::to_string),
            staff_role_id: filled(self.staff_role_id.as_deref()).map(str::to_string),
            timezone: filled(self.timezone.as_deref())
                .unwrap_or(GuildSettings::DEFAULT_TIMEZONE)
                .to_string(),
            category_slots: int_or(
                "category_slots",
                self.category_slots.as_deref(),
                GuildSettings::DEFAULT_CATEGORY_SLOTS,
            )?,
            warn_threshold: int_or(
                "warn_threshold",
                self.warn_threshold.as_deref(),
                GuildSettings::DEFAULT_WARN_THRESHOLD,
            )?,
            warn_timeout_minutes: int_or(
                "warn_timeout_minutes",
                self.warn_timeout_minutes.as_deref(),
                GuildSettings::DEFAULT_WARN_TIMEOUT_MINUTES,
            )?,
            enable_smart_replies: self.enable_smart_replies.is_some(),
            enable_ai_suggestions: self.enable_ai_suggestions.is_some(),
            enable_auto_priority: self.enable_auto_priority.is_some(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddCategoryForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl AddCategoryForm {
    pub fn name(&self) -> Result<&str, ApiError> {
        filled(self.name.as_deref()).ok_or_else(|| ApiError::bad_request("Category name is required"))
    }

    pub fn description(&self) -> Option<&str> {
        filled(self.description.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCategoryForm {
    pub category_id: Option<String>,
}

impl DeleteCategoryForm {
    /// `None` for a blank id, which the route treats as nothing to do.
    pub fn category_id(&self) -> Result<Option<i64>, ApiError> {
        filled(self.category_id.as_deref())
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| ApiError::bad_request("category_id must be a whole number"))
            })
            .transpose()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PanelForm {
    pub channel_id: Option<String>,
}

impl PanelForm {
    pub fn channel_id(&self) -> Result<u64, ApiError> {
        filled(self.channel_id.as_deref())
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::bad_request("channel_id must be a positive channel id"))
    }
}
