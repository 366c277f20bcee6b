use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;

use super::{GuildSettings, SettingsStore, StoreError, TicketCategory};
use crate::config::DatabaseConfig;

const CREATE_GUILD_SETTINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS guild_settings (
        guild_id                 TEXT PRIMARY KEY,
        ticket_parent_channel_id TEXT,
        staff_role_id            TEXT,
        timezone                 TEXT NOT NULL DEFAULT 'UTC',
        category_slots           INTEGER NOT NULL DEFAULT 1,
        warn_threshold           INTEGER NOT NULL DEFAULT 3,
        warn_timeout_minutes     INTEGER NOT NULL DEFAULT 10,
        enable_smart_replies     BOOLEAN NOT NULL DEFAULT TRUE,
        enable_ai_suggestions    BOOLEAN NOT NULL DEFAULT TRUE,
        enable_auto_priority     BOOLEAN NOT NULL DEFAULT TRUE,
        updated_at               TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_TICKET_CATEGORIES: &str = r#"
    CREATE TABLE IF NOT EXISTS ticket_categories (
        id          BIGSERIAL PRIMARY KEY,
        guild_id    TEXT NOT NULL,
        name        TEXT NOT NULL,
        description TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS ticket_categories_guild_idx ON ticket_categories (guild_id)";

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and make sure both tables exist.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await?;

        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        info!("Connected settings store ({} max connections)", config.max_connections);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_GUILD_SETTINGS, CREATE_TICKET_CATEGORIES, CREATE_CATEGORY_INDEX] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn settings_from_row(row: &PgRow) -> Result<GuildSettings, sqlx::Error> {
        Ok(GuildSettings {
            guild_id: row.try_get("guild_id")?,
            ticket_parent_channel_id: row.try_get("ticket_parent_channel_id")?,
            staff_role_id: row.try_get("staff_role_id")?,
            timezone: row.try_get("timezone")?,
            category_slots: row.try_get("category_slots")?,
            warn_threshold: row.try_get("warn_threshold")?,
            warn_timeout_minutes: row.try_get("warn_timeout_minutes")?,
            enable_smart_replies: row.try_get("enable_smart_replies")?,
            enable_ai_suggestions: row.try_get("enable_ai_suggestions")?,
            enable_auto_priority: row.try_get("enable_auto_priority")?,
        })
    }

    fn category_from_row(row: &PgRow) -> Result<TicketCategory, sqlx::Error> {
        Ok(TicketCategory {
            id: row.try_get("id")?,
            guild_id: row.try_get("guild_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn get_guild_settings(&self, guild_id: &str) -> Result<Option<GuildSettings>, StoreError> {
        let query = r#"
            SELECT
                guild_id, ticket_parent_channel_id, staff_role_id, timezone,
                category_slots, warn_threshold, warn_timeout_minutes,
                enable_smart_replies, enable_ai_suggestions, enable_auto_priority
            FROM guild_settings
            WHERE guild_id = $1
        "#;

        let row = sqlx::query(query).bind(guild_id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(Self::settings_from_row).transpose()?)
    }

    async fn upsert_guild_settings(&self, settings: &GuildSettings) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO guild_settings (
                guild_id, ticket_parent_channel_id, staff_role_id, timezone,
                category_slots, warn_threshold, warn_timeout_minutes,
                enable_smart_replies, enable_ai_suggestions, enable_auto_priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (guild_id) DO UPDATE SET
                ticket_parent_channel_id = EXCLUDED.ticket_parent_channel_id,
                staff_role_id = EXCLUDED.staff_role_id,
                timezone = EXCLUDED.timezone,
                category_slots = EXCLUDED.category_slots,
                warn_threshold = EXCLUDED.warn_threshold,
                warn_timeout_minutes = EXCLUDED.warn_timeout_minutes,
                enable_smart_replies = EXCLUDED.enable_smart_replies,
                enable_ai_suggestions = EXCLUDED.enable_ai_suggestions,
                enable_auto_priority = EXCLUDED.enable_auto_priority,
                updated_at = now()
        "#;

        sqlx::query(query)
            .bind(&settings.guild_id)
            .bind(&settings.ticket_parent_channel_id)
            .bind(&settings.staff_role_id)
            .bind(&settings.timezone)
            .bind(settings.category_slots)
            .bind(settings.warn_threshold)
            .bind(settings.warn_timeout_minutes)
            .bind(settings.enable_smart_replies)
            .bind(settings.enable_ai_suggestions)
            .bind(settings.enable_auto_priority)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_categories(&self, guild_id: &str) -> Result<Vec<TicketCategory>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, guild_id, name, description, created_at FROM ticket_categories WHERE guild_id = $1 ORDER BY id",
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(Self::category_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn create_category(
        &self,
        guild_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<TicketCategory, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Invalid("category name is empty".to_string()));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO ticket_categories (guild_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, guild_id, name, description, created_at
            "#,
        )
        .bind(guild_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::category_from_row(&row)?)
    }

    async fn delete_category(&self, guild_id: &str, category_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM ticket_categories WHERE id = $1 AND guild_id = $2")
            .bind(category_id)
            .bind(guild_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
