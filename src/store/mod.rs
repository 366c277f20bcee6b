//! Guild settings and ticket category persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::MemorySettingsStore;
pub use postgres::PgSettingsStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: String,
    pub ticket_parent_channel_id: Option<String>,
    pub staff_role_id: Option<String>,
    pub timezone: String,
    pub category_slots: i32,
    pub warn_threshold: i32,
    pub warn_timeout_minutes: i32,
    pub enable_smart_replies: bool,
    pub enable_ai_suggestions: bool,
    pub enable_auto_priority: bool,
}

impl GuildSettings {
    pub const DEFAULT_TIMEZONE: &'static str = "UTC";
    pub const DEFAULT_CATEGORY_SLOTS: i32 = 1;
    pub const DEFAULT_WARN_THRESHOLD: i32 = 3;
    pub const DEFAULT_WARN_TIMEOUT_MINUTES: i32 = 10;

    /// Settings a guild has before anything is saved.
    pub fn defaults_for(guild_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            ticket_parent_channel_id: None,
            staff_role_id: None,
            timezone: Self::DEFAULT_TIMEZONE.to_string(),
            category_slots: Self::DEFAULT_CATEGORY_SLOTS,
            warn_threshold: Self::DEFAULT_WARN_THRESHOLD,
            warn_timeout_minutes: Self::DEFAULT_WARN_TIMEOUT_MINUTES,
            enable_smart_replies: true,
            enable_ai_suggestions: true,
            enable_auto_priority: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCategory {
    pub id: i64,
    pub guild_id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_guild_settings(&self, guild_id: &str) -> Result<Option<GuildSettings>, StoreError>;

    /// Insert or replace the row keyed by `settings.guild_id`.
    async fn upsert_guild_settings(&self, settings: &GuildSettings) -> Result<(), StoreError>;

    /// Categories of one guild, oldest first.
    async fn list_categories(&self, guild_id: &str) -> Result<Vec<TicketCategory>, StoreError>;

    async fn create_category(
        &self,
        guild_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<TicketCategory, StoreError>;

    /// Returns false when no category with that id belongs to the guild.
    async fn delete_category(&self, guild_id: &str, category_id: i64) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
