use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{GuildSettings, SettingsStore, StoreError, TicketCategory};

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemorySettingsStore {
    settings: RwLock<HashMap<String, GuildSettings>>,
    categories: RwLock<Vec<TicketCategory>>,
    next_id: AtomicI64,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_guild_settings(&self, guild_id: &str) -> Result<Option<GuildSettings>, StoreError> {
        Ok(self.settings.read().await.get(guild_id).cloned())
    }

    async fn upsert_guild_settings(&self, settings: &GuildSettings) -> Result<(), StoreError> {
        self.settings
            .write()
            .await
            .insert(settings.guild_id.clone(), settings.clone());
        Ok(())
    }

    async fn list_categories(&self, guild_id: &str) -> Result<Vec<TicketCategory>, StoreError> {
        Ok(self
            .categories
            .read()
            .await
            .iter()
            .filter(|c| c.guild_id == guild_id)
            .cloned()
            .collect())
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

        let category = TicketCategory {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            guild_id: guild_id.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        self.categories.write().await.push(category.clone());
        Ok(category)
    }

    async fn delete_category(&self, guild_id: &str, category_id: i64) -> Result<bool, StoreError> {
        let mut categories = self.categories.write().await;
        let before = categories.len();
        categories.retain(|c| !(c.id == category_id && c.guild_id == guild_id));
        Ok(categories.len() != before)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
