use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::AppConfig;
use crate::discord::{
    DiscordIdentityClient, DiscordInstallationProber, DiscordRest, IdentityProvider, InstallationProber,
    MessagingClient,
};
use crate::session::{cookie, SessionStore, SessionTtl};
use crate::store::SettingsStore;

/// Everything a route handler needs, built once at start-up.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub identity: Arc<dyn IdentityProvider>,
    pub prober: Arc<dyn InstallationProber>,
    pub store: Arc<dyn SettingsStore>,
    pub messaging: Arc<dyn MessagingClient>,
    pub sessions: SessionStore,
    cookie_key: Key,
}

impl FromRef<AppContext> for Key {
    fn from_ref(ctx: &AppContext) -> Self {
        ctx.cookie_key.clone()
    }
}

impl AppContext {
    /// Wire the real Discord clients around the given store.
    pub fn from_config(config: AppConfig, store: Arc<dyn SettingsStore>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(concat!("ticket-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let discord = &config.discord;
        let identity = DiscordIdentityClient::new(discord.clone(), http.clone());
        let prober = DiscordInstallationProber::new(&discord.api_base, discord.bot_token.clone(), http.clone());
        let messaging = DiscordRest::new(&discord.api_base, discord.bot_token.clone(), http);

        Ok(Self::with_collaborators(
            config,
            Arc::new(identity),
            Arc::new(prober),
            store,
            Arc::new(messaging),
        ))
    }

    /// Assemble a context from explicit collaborators.
    pub fn with_collaborators(
        config: AppConfig,
        identity: Arc<dyn IdentityProvider>,
        prober: Arc<dyn InstallationProber>,
        store: Arc<dyn SettingsStore>,
        messaging: Arc<dyn MessagingClient>,
    ) -> Self {
        let cookie_key = cookie::signing_key(config.session.secret.as_deref());
        let sessions = SessionStore::with_ttl(SessionTtl {
            idle: Duration::from_secs(config.session.idle_ttl_secs),
            pending: Duration::from_secs(config.session.pending_ttl_secs),
        });
        Self {
            config: Arc::new(config),
            identity,
            prober,
            store,
            messaging,
            sessions,
            cookie_key,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}
