#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use ticket_dashboard::config::AppConfig;
use ticket_dashboard::discord::{
    DiscordError, IdentityProvider, InstallationProber, InstallationStatus, MessagingClient, MessagingError,
    OperatorIdentity, TenantMembership, TokenGrant,
};
use ticket_dashboard::session::SessionStore;
use ticket_dashboard::store::MemorySettingsStore;
use ticket_dashboard::{app, AppContext};

pub const COOKIE_NAME: &str = "ticket_dashboard_session";

pub fn membership(id: &str, name: &str, permissions: u64) -> TenantMembership {
    TenantMembership {
        id: id.to_string(),
        name: name.to_string(),
        permissions,
    }
}

pub const IDENTITY_LOOKUP: &str = "identity lookup";
pub const MEMBERSHIP_LOOKUP: &str = "guild membership lookup";

/// Identity provider double. Code `bad` fails the exchange; `failing_lookup`
/// makes the named read answer 401 the way a revoked token would.
pub struct FakeIdentity {
    pub memberships: Mutex<Vec<TenantMembership>>,
    pub exchanged: Mutex<Vec<String>>,
    pub failing_lookup: Mutex<Option<&'static str>>,
}

impl FakeIdentity {
    fn lookup(&self, operation: &'static str) -> Result<(), DiscordError> {
        if *self.failing_lookup.lock().unwrap() == Some(operation) {
            return Err(DiscordError::Upstream {
                operation,
                status: 401,
                body: "{\"message\": \"401: Unauthorized\"}".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn exchange_code(&self, code: &str) -> Result<TokenGrant, DiscordError> {
        self.exchanged.lock().unwrap().push(code.to_string());
        if code == "bad" {
            return Err(DiscordError::Exchange("{\"error\":\"invalid_grant\"}".to_string()));
        }
        Ok(TokenGrant {
            access_token: format!("token-{code}"),
            token_type: Some("Bearer".to_string()),
            expires_in: Some(604800),
        })
    }

    async fn fetch_identity(&self, _access_token: &str) -> Result<OperatorIdentity, DiscordError> {
        self.lookup(IDENTITY_LOOKUP)?;
        Ok(OperatorIdentity {
            id: "4242".to_string(),
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            discriminator: "0".to_string(),
        })
    }

    async fn fetch_memberships(&self, _access_token: &str) -> Result<Vec<TenantMembership>, DiscordError> {
        self.lookup(MEMBERSHIP_LOOKUP)?;
        Ok(self.memberships.lock().unwrap().clone())
    }
}

/// Reports the bot as installed only in the listed guilds, the way a 200 vs
/// 404 from Discord would.
pub struct FakeProber {
    pub installed: HashSet<String>,
}

#[async_trait]
impl InstallationProber for FakeProber {
    async fn probe(&self, guild_id: &str) -> InstallationStatus {
        if self.installed.contains(guild_id) {
            InstallationStatus::Installed
        } else {
            InstallationStatus::NotInstalled
        }
    }
}

/// Records every posted payload; `fail` makes Discord reject the post.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<(u64, Value)>>,
    pub fail: bool,
}

#[async_trait]
impl MessagingClient for RecordingMessenger {
    async fn send_channel_message(&self, channel_id: u64, payload: &Value) -> Result<(), MessagingError> {
        if self.fail {
            return Err(MessagingError::Rejected {
                channel_id,
                status: 403,
                body: "{\"message\":\"Missing Access\"}".to_string(),
            });
        }
        self.sent.lock().unwrap().push((channel_id, payload.clone()));
        Ok(())
    }
}

pub fn test_env() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("DISCORD_APP_ID", "1100"),
        ("DISCORD_CLIENT_SECRET", "client-secret"),
        ("OAUTH_REDIRECT_URI", "http://localhost:8080/auth/callback"),
        ("DISCORD_TOKEN", "bot-token"),
        ("SESSION_SECRET", "integration-test-session-secret"),
    ])
}

pub struct TestApp {
    pub router: Router,
    pub identity: Arc<FakeIdentity>,
    pub store: Arc<MemorySettingsStore>,
    pub messenger: Arc<RecordingMessenger>,
    pub sessions: SessionStore,
}

pub struct TestAppBuilder {
    env: HashMap<&'static str, &'static str>,
    memberships: Vec<TenantMembership>,
    installed: Vec<&'static str>,
    messaging_fails: bool,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            env: test_env(),
            memberships: vec![
                membership("T1", "Tenant One", 0x20),
                membership("T2", "Tenant Two", 0x21),
                membership("T3", "Read Only", 0x10),
            ],
            installed: vec!["T2"],
            messaging_fails: false,
        }
    }

    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }
}

impl TestAppBuilder {
    pub fn with_env(mut self, key: &'static str, value: &'static str) -> Self {
        self.env.insert(key, value);
        self
    }

    pub fn without(mut self, key: &'static str) -> Self {
        self.env.remove(key);
        self
    }

    pub fn memberships(mut self, memberships: Vec<TenantMembership>) -> Self {
        self.memberships = memberships;
        self
    }

    pub fn installed(mut self, installed: Vec<&'static str>) -> Self {
        self.installed = installed;
        self
    }

    pub fn messaging_fails(mut self) -> Self {
        self.messaging_fails = true;
        self
    }

    pub fn build(self) -> TestApp {
        let config = AppConfig::from_map(&self.env);
        let identity = Arc::new(FakeIdentity {
            memberships: Mutex::new(self.memberships),
            exchanged: Mutex::new(Vec::new()),
            failing_lookup: Mutex::new(None),
        });
        let prober = Arc::new(FakeProber {
            installed: self.installed.into_iter().map(str::to_string).collect(),
        });
        let store = Arc::new(MemorySettingsStore::new());
        let messenger = Arc::new(RecordingMessenger {
            sent: Mutex::new(Vec::new()),
            fail: self.messaging_fails,
        });

        let ctx = AppContext::with_collaborators(
            config,
            identity.clone(),
            prober,
            store.clone(),
            messenger.clone(),
        );

        TestApp {
            sessions: ctx.sessions.clone(),
            router: app(ctx),
            identity,
            store,
            messenger,
        }
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).context("response body is not JSON")
    }

    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}

/// One browser: carries the session cookie between requests.
pub struct Browser {
    router: Router,
    pub cookie: Option<String>,
}

impl Browser {
    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        let request = Request::builder().method("GET").uri(path);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, path: &str, form: &str) -> Result<TestResponse> {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(form.to_string())).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> Result<TestResponse> {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie.clone());
        }
        let response = self.router.clone().oneshot(request.body(body)?).await?;

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let pair = set_cookie.to_str()?.split(';').next().unwrap_or_default().to_string();
            if pair.starts_with(&format!("{COOKIE_NAME}=")) {
                let empty = pair.len() == COOKIE_NAME.len() + 1;
                self.cookie = if empty { None } else { Some(pair) };
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().map(str::to_string))
            .transpose()?;
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

        Ok(TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }

    /// `/auth/login`, returning the `state` the provider would echo back.
    pub async fn start_login(&mut self) -> Result<String> {
        let response = self.get("/auth/login").await?;
        assert_eq!(response.status, StatusCode::FOUND);
        let location = response.location.context("login did not redirect")?;
        let url = url::Url::parse(&location)?;
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .context("authorization URL has no state")?;
        Ok(state)
    }

    /// Full login: `/auth/login` then a successful `/auth/callback`.
    pub async fn login(&mut self) -> Result<()> {
        let state = self.start_login().await?;
        let response = self.get(&format!("/auth/callback?code=good&state={state}")).await?;
        assert_eq!(response.status, StatusCode::OK, "callback failed: {}", response.body);
        Ok(())
    }
}
