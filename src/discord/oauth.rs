use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use url::Url;

use super::permissions::INVITE_PERMISSIONS;
use super::{DiscordError, IdentityProvider, OperatorIdentity, TenantMembership, TokenGrant};
use crate::config::DiscordConfig;

/// Scopes requested for the operator login.
pub const OPERATOR_SCOPES: &str = "identify guilds";

/// Scopes requested when adding the bot to a guild.
pub const BOT_SCOPES: &str = "bot applications.commands";

/// Redirect target plus the anti-forgery token to remember in the session.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// 16 random bytes, base64url without padding (22 characters).
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the operator login URL with a fresh anti-forgery token.
pub fn begin_authorization(config: &DiscordConfig) -> Result<AuthorizationRequest, DiscordError> {
    let app_id = config.app_id.as_deref().ok_or(DiscordError::ConfigMissing("DISCORD_APP_ID"))?;
    let redirect_uri = config
        .redirect_uri
        .as_deref()
        .ok_or(DiscordError::ConfigMissing("OAUTH_REDIRECT_URI"))?;

    let state = generate_state();
    let mut url = parse_url("DISCORD_AUTHORIZE_URL", &config.authorize_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", app_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", OPERATOR_SCOPES)
        .append_pair("state", &state)
        .append_pair("prompt", "consent");

    Ok(AuthorizationRequest { url: url.into(), state })
}

/// Build the bot invite URL, pre-selecting the given guild.
pub fn invite_url(config: &DiscordConfig, guild_id: &str) -> Result<String, DiscordError> {
    let app_id = config.app_id.as_deref().ok_or(DiscordError::ConfigMissing("DISCORD_APP_ID"))?;

    let mut url = parse_url("DISCORD_AUTHORIZE_URL", &config.authorize_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", app_id)
        .append_pair("permissions", &INVITE_PERMISSIONS.to_string())
        .append_pair("scope", BOT_SCOPES)
        .append_pair("guild_id", guild_id);

    Ok(url.into())
}

fn parse_url(setting: &'static str, raw: &str) -> Result<Url, DiscordError> {
    Url::parse(raw).map_err(|e| DiscordError::InvalidUrl {
        setting,
        reason: e.to_string(),
    })
}

/// Operator-side Discord client (code exchange and bearer-token reads).
pub struct DiscordIdentityClient {
    config: DiscordConfig,
    http: reqwest::Client,
}

impl DiscordIdentityClient {
    pub fn new(config: DiscordConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
        operation: &'static str,
    ) -> Result<T, DiscordError> {
        let response = self
            .http
            .get(format!("{}{}", self.config.api_base, path))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Upstream {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityProvider for DiscordIdentityClient {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, DiscordError> {
        let app_id = self.config.app_id.as_deref().ok_or(DiscordError::ConfigMissing("DISCORD_APP_ID"))?;
        let secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(DiscordError::ConfigMissing("DISCORD_CLIENT_SECRET"))?;
        let redirect_uri = self
            .config
            .redirect_uri
            .as_deref()
            .ok_or(DiscordError::ConfigMissing("OAUTH_REDIRECT_URI"))?;

        let params = [
            ("client_id", app_id),
            ("client_secret", secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("scope", OPERATOR_SCOPES),
        ];

        let response = self.http.post(&self.config.token_url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscordError::Exchange(body));
        }

        Ok(response.json::<TokenGrant>().await?)
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<OperatorIdentity, DiscordError> {
        self.get_json("/users/@me", access_token, "identity lookup").await
    }

    async fn fetch_memberships(&self, access_token: &str) -> Result<Vec<TenantMembership>, DiscordError> {
        self.get_json("/users/@me/guilds", access_token, "guild membership lookup")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> DiscordConfig {
        DiscordConfig {
            app_id: Some("4242".to_string()),
            redirect_uri: Some("http://localhost:8080/auth/callback".to_string()),
            ..DiscordConfig::default()
        }
    }

    fn query(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_state_is_url_safe_and_unique() {
        let a = generate_state();
        let b = generate_state();
        assert_eq!(a.len(), 22);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }

    #[test]
    fn test_authorization_url_carries_state_and_scopes() {
        let req = begin_authorization(&configured()).unwrap();
        assert!(req.url.starts_with("https://discord.com/api/oauth2/authorize?"));
        let q = query(&req.url);
        assert_eq!(q["client_id"], "4242");
        assert_eq!(q["redirect_uri"], "http://localhost:8080/auth/callback");
        assert_eq!(q["response_type"], "code");
        assert_eq!(q["scope"], "identify guilds");
        assert_eq!(q["state"], req.state);
    }

    #[test]
    fn test_authorization_requires_app_id_and_redirect() {
        let mut config = configured();
        config.redirect_uri = None;
        assert!(matches!(
            begin_authorization(&config),
            Err(DiscordError::ConfigMissing("OAUTH_REDIRECT_URI"))
        ));

        config = configured();
        config.app_id = None;
        assert!(matches!(
            begin_authorization(&config),
            Err(DiscordError::ConfigMissing("DISCORD_APP_ID"))
        ));
    }

    #[test]
    fn test_invite_url() {
        let url = invite_url(&configured(), "T1").unwrap();
        let q = query(&url);
        assert_eq!(q["guild_id"], "T1");
        assert_eq!(q["permissions"], INVITE_PERMISSIONS.to_string());
        assert_eq!(q["scope"], "bot applications.commands");
        assert_eq!(q["client_id"], "4242");
    }

    #[test]
    fn test_invite_url_needs_only_app_id() {
        let config = DiscordConfig {
            app_id: Some("1".to_string()),
            ..DiscordConfig::default()
        };
        assert!(invite_url(&config, "99").is_ok());
        assert!(invite_url(&DiscordConfig::default(), "99").is_err());
    }
}
