use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use super::{InstallationProber, InstallationStatus, TenantMembership};

/// Looks up `/guilds/{id}` with the bot credential. The bot can only read a
/// guild it has joined, so `200` means installed.
pub struct DiscordInstallationProber {
    api_base: String,
    bot_token: Option<String>,
    http: reqwest::Client,
}

impl DiscordInstallationProber {
    pub fn new(api_base: impl Into<String>, bot_token: Option<String>, http: reqwest::Client) -> Self {
        Self {
            api_base: api_base.into(),
            bot_token,
            http,
        }
    }
}

#[async_trait]
impl InstallationProber for DiscordInstallationProber {
    async fn probe(&self, guild_id: &str) -> InstallationStatus {
        let Some(token) = self.bot_token.as_deref() else {
            tracing::warn!(guild_id, "DISCORD_TOKEN missing, reporting guild as not installed");
            return InstallationStatus::NotInstalled;
        };

        let result = self
            .http
            .get(format!("{}/guilds/{}", self.api_base, guild_id))
            .header(reqwest::header::AUTHORIZATION, format!("Bot {token}"))
            .send()
            .await;

        match result {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                tracing::debug!(guild_id, "bot installed");
                InstallationStatus::Installed
            }
            Ok(response) => {
                tracing::debug!(guild_id, status = response.status().as_u16(), "bot not installed");
                InstallationStatus::NotInstalled
            }
            Err(e) => {
                tracing::debug!(guild_id, error = %e, "installation lookup failed");
                InstallationStatus::NotInstalled
            }
        }
    }
}

/// Most lookups in flight at once. Discord rate-limits bot reads per route,
/// and a 429 would read as "not installed".
pub const PROBE_CONCURRENCY: usize = 8;

/// Probe every membership, at most [`PROBE_CONCURRENCY`] at a time, keeping
/// the input order.
pub async fn probe_all(
    prober: &dyn InstallationProber,
    memberships: Vec<TenantMembership>,
) -> Vec<(TenantMembership, InstallationStatus)> {
    let probes: Vec<_> = memberships.iter().map(|m| prober.probe(&m.id)).collect();
    let statuses: Vec<InstallationStatus> = stream::iter(probes)
        .buffered(PROBE_CONCURRENCY)
        .collect()
        .await;
    memberships.into_iter().zip(statuses).collect()
}
