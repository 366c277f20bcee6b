use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub discord: DiscordConfig,
    pub session: SessionConfig,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Identity provider and bot settings. The optional fields are checked at the
/// route that needs them so a partially configured deployment still serves.
#[derive(Clone)]
pub struct DiscordConfig {
    pub app_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub bot_token: Option<String>,
    pub api_base: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("app_id", &self.app_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("redirect_uri", &self.redirect_uri)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionConfig {
    pub secret: Option<String>,
    pub cookie_name: String,
    pub secure_cookies: bool,
    /// Idle lifetime of an authenticated session.
    pub idle_ttl_secs: u64,
    /// Lifetime of a session that only started a login.
    pub pending_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("cookie_name", &self.cookie_name)
            .field("secure_cookies", &self.secure_cookies)
            .field("idle_ttl_secs", &self.idle_ttl_secs)
            .field("pending_ttl_secs", &self.pending_ttl_secs)
            .field("sweep_interval_secs", &self.sweep_interval_secs)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Applied to every upstream call (token exchange, lookups, panel posts).
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(get)
    }

    /// Convenience for tests: build from a fixed map of variables.
    pub fn from_map(vars: &HashMap<&str, &str>) -> Self {
        Self::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    fn with_overrides<F>(mut self, get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = get("BIND_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("PORT") {
            self.server.port = parsed("PORT", &v, self.server.port);
        }

        // Discord
        self.discord.app_id = get("DISCORD_APP_ID");
        self.discord.client_secret = get("DISCORD_CLIENT_SECRET");
        self.discord.redirect_uri = get("OAUTH_REDIRECT_URI");
        self.discord.bot_token = get("DISCORD_TOKEN");
        if let Some(v) = get("DISCORD_API_BASE") {
            self.discord.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("DISCORD_AUTHORIZE_URL") {
            self.discord.authorize_url = v;
        }
        if let Some(v) = get("DISCORD_TOKEN_URL") {
            self.discord.token_url = v;
        }

        // Session
        self.session.secret = get("SESSION_SECRET");
        if let Some(v) = get("SESSION_COOKIE_NAME") {
            self.session.cookie_name = v;
        }
        if let Some(v) = get("SESSION_SECURE_COOKIES") {
            self.session.secure_cookies = parsed("SESSION_SECURE_COOKIES", &v, self.session.secure_cookies);
        }
        if let Some(v) = get("SESSION_IDLE_TTL_SECS") {
            self.session.idle_ttl_secs = parsed("SESSION_IDLE_TTL_SECS", &v, self.session.idle_ttl_secs);
        }
        if let Some(v) = get("SESSION_PENDING_TTL_SECS") {
            self.session.pending_ttl_secs = parsed("SESSION_PENDING_TTL_SECS", &v, self.session.pending_ttl_secs);
        }
        if let Some(v) = get("SESSION_SWEEP_INTERVAL_SECS") {
            self.session.sweep_interval_secs =
                parsed("SESSION_SWEEP_INTERVAL_SECS", &v, self.session.sweep_interval_secs);
        }

        // Database
        self.database.url = get("DATABASE_URL");
        if let Some(v) = get("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parsed("DATABASE_MAX_CONNECTIONS", &v, self.database.max_connections);
        }
        if let Some(v) = get("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                parsed("DATABASE_CONNECT_TIMEOUT_SECS", &v, self.database.connect_timeout_secs);
        }

        // HTTP client
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = parsed("HTTP_TIMEOUT_SECS", &v, self.http.timeout_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            discord: DiscordConfig::default(),
            session: SessionConfig {
                secret: None,
                cookie_name: "ticket_dashboard_session".to_string(),
                secure_cookies: false,
                idle_ttl_secs: 24 * 60 * 60,
                pending_ttl_secs: 10 * 60,
                sweep_interval_secs: 60,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connect_timeout_secs: 30,
            },
            http: HttpConfig { timeout_secs: 30 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            session: SessionConfig {
                secure_cookies: true,
                ..Self::development().session
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connect_timeout_secs: 10,
            },
            http: HttpConfig { timeout_secs: 15 },
            ..Self::development()
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            session: SessionConfig {
                secure_cookies: true,
                ..Self::development().session
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connect_timeout_secs: 5,
            },
            http: HttpConfig { timeout_secs: 10 },
            ..Self::development()
        }
    }
}

/// Parse an override, keeping `fallback` (and saying so) when it is malformed.
fn parsed<T>(key: &str, raw: &str, fallback: T) -> T
where
    T: FromStr + Display,
{
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = raw, default = %fallback, "ignoring invalid setting");
            fallback
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            client_secret: None,
            redirect_uri: None,
            bot_token: None,
            api_base: "https://discord.com/api/v10".to_string(),
            authorize_url: "https://discord.com/api/oauth2/authorize".to_string(),
            token_url: "https://discord.com/api/oauth2/token".to_string(),
        }
    }
}
