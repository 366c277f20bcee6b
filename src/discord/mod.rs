//! Discord-facing clients: operator OAuth, bot installation lookups and
//! channel message posting.
//!
//! Each network concern sits behind a trait so the router can be exercised
//! with in-memory doubles.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod installation;
pub mod oauth;
pub mod permissions;
pub mod rest;

pub use installation::{probe_all, DiscordInstallationProber};
pub use oauth::{AuthorizationRequest, DiscordIdentityClient};
pub use rest::DiscordRest;

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("{0} missing")]
    ConfigMissing(&'static str),

    #[error("Invalid URL for {setting}: {reason}")]
    InvalidUrl { setting: &'static str, reason: String },

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("{operation} failed with status {status}: {body}")]
    Upstream {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from posting messages into a channel.
#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("DISCORD_TOKEN missing")]
    MissingToken,

    #[error("channel {channel_id} rejected message with status {status}: {body}")]
    Rejected { channel_id: u64, status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Result of the authorization-code exchange.
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl std::fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGrant")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Cached operator profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorIdentity {
    pub id: String,
    pub username: String,
    #[serde(default, rename = "global_name")]
    pub display_name: Option<String>,
    #[serde(default = "default_discriminator")]
    pub discriminator: String,
}

fn default_discriminator() -> String {
    "0".to_string()
}

impl OperatorIdentity {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// `name#1234` for legacy accounts, plain username for migrated ones.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

/// One operator-to-guild relationship as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantMembership {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_permissions")]
    pub permissions: u64,
}

/// Discord sends permissions as a decimal string; older payloads use a number.
fn deserialize_permissions<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallationStatus {
    Installed,
    NotInstalled,
}

impl InstallationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallationStatus::Installed => "installed",
            InstallationStatus::NotInstalled => "not-installed",
        }
    }
}

/// Operator-credentialed reads and the code exchange.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, DiscordError>;
    async fn fetch_identity(&self, access_token: &str) -> Result<OperatorIdentity, DiscordError>;
    async fn fetch_memberships(&self, access_token: &str) -> Result<Vec<TenantMembership>, DiscordError>;
}

/// Service-credentialed lookup for bot presence in a guild.
///
/// Any failure collapses to `NotInstalled`; the result is always binary.
#[async_trait]
pub trait InstallationProber: Send + Sync {
    async fn probe(&self, guild_id: &str) -> InstallationStatus;
}

#[async_trait]
pub trait MessagingClient: Send + Sync {
    async fn send_channel_message(
        &self,
        channel_id: u64,
        payload: &serde_json::Value,
    ) -> Result<(), MessagingError>;
}
