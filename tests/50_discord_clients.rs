use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticket_dashboard::config::DiscordConfig;
use ticket_dashboard::discord::{
    DiscordError, DiscordIdentityClient, DiscordInstallationProber, DiscordRest, IdentityProvider,
    InstallationProber, InstallationStatus, MessagingClient, MessagingError,
};

fn config_for(server: &MockServer) -> DiscordConfig {
    DiscordConfig {
        app_id: Some("1100".to_string()),
        client_secret: Some("client-secret".to_string()),
        redirect_uri: Some("http://localhost:8080/auth/callback".to_string()),
        bot_token: Some("bot-token".to_string()),
        api_base: server.uri(),
        token_url: format!("{}/oauth2/token", server.uri()),
        ..DiscordConfig::default()
    }
}

#[tokio::test]
async fn exchange_posts_form_and_reads_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "operator-token",
            "token_type": "Bearer",
            "expires_in": 604800,
            "scope": "identify guilds"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = DiscordIdentityClient::new(config_for(&server), reqwest::Client::new());
    let grant = client.exchange_code("abc").await?;
    assert_eq!(grant.access_token, "operator-token");
    Ok(())
}

#[tokio::test]
async fn exchange_failure_keeps_provider_body() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"invalid_grant\"}"))
        .mount(&server)
        .await;

    let client = DiscordIdentityClient::new(config_for(&server), reqwest::Client::new());
    match client.exchange_code("expired").await {
        Err(DiscordError::Exchange(body)) => assert!(body.contains("invalid_grant")),
        other => panic!("expected exchange error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn identity_and_memberships_use_bearer_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me"))
        .and(header("authorization", "Bearer operator-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "4242",
            "username": "alice",
            "global_name": "Alice",
            "discriminator": "0"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/@me/guilds"))
        .and(header("authorization", "Bearer operator-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "1", "name": "Admins", "permissions": "2147483647"},
            {"id": "2", "name": "Members", "permissions": "1024"}
        ])))
        .mount(&server)
        .await;

    let client = DiscordIdentityClient::new(config_for(&server), reqwest::Client::new());
    let identity = client.fetch_identity("operator-token").await?;
    assert_eq!(identity.display_name(), "Alice");

    let memberships = client.fetch_memberships("operator-token").await?;
    assert_eq!(memberships.len(), 2);
    assert_eq!(memberships[0].permissions, 2147483647);
    assert_eq!(memberships[1].permissions, 1024);
    Ok(())
}

#[tokio::test]
async fn upstream_error_on_read_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/@me/guilds"))
        .respond_with(ResponseTemplate::new(401).set_body_string("401: Unauthorized"))
        .mount(&server)
        .await;

    let client = DiscordIdentityClient::new(config_for(&server), reqwest::Client::new());
    match client.fetch_memberships("revoked").await {
        Err(DiscordError::Upstream { status, body, .. }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Unauthorized"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn prober_is_binary_over_status_codes() -> Result<()> {
    let server = MockServer::start().await;
    for (guild, status) in [("200", 200), ("403", 403), ("404", 404), ("500", 500)] {
        Mock::given(method("GET"))
            .and(path(format!("/guilds/{guild}")))
            .and(header("authorization", "Bot bot-token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"id": guild})))
            .mount(&server)
            .await;
    }

    let prober = DiscordInstallationProber::new(server.uri(), Some("bot-token".to_string()), reqwest::Client::new());
    assert_eq!(prober.probe("200").await, InstallationStatus::Installed);
    assert_eq!(prober.probe("403").await, InstallationStatus::NotInstalled);
    assert_eq!(prober.probe("404").await, InstallationStatus::NotInstalled);
    assert_eq!(prober.probe("500").await, InstallationStatus::NotInstalled);
    Ok(())
}

#[tokio::test]
async fn prober_never_uses_operator_credentials() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guilds/1"))
        .and(header("authorization", "Bot bot-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let prober = DiscordInstallationProber::new(server.uri(), Some("bot-token".to_string()), reqwest::Client::new());
    assert_eq!(prober.probe("1").await, InstallationStatus::Installed);
    Ok(())
}

#[tokio::test]
async fn rest_posts_panel_with_bot_auth() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(header("authorization", "Bot bot-token"))
        .and(body_string_contains("\"title\":\"Need help?\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
        .expect(1)
        .mount(&server)
        .await;

    let rest = DiscordRest::new(server.uri(), Some("bot-token".to_string()), reqwest::Client::new());
    let payload = ticket_dashboard::panels::render_open_panel(&[]);
    rest.send_channel_message(42, &payload).await?;
    Ok(())
}

#[tokio::test]
async fn rest_reports_rejection_and_missing_token() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(403).set_body_string("{\"message\":\"Missing Access\"}"))
        .mount(&server)
        .await;

    let rest = DiscordRest::new(server.uri(), Some("bot-token".to_string()), reqwest::Client::new());
    match rest.send_channel_message(42, &json!({})).await {
        Err(MessagingError::Rejected { status, body, .. }) => {
            assert_eq!(status, 403);
            assert!(body.contains("Missing Access"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    let tokenless = DiscordRest::new(server.uri(), None, reqwest::Client::new());
    assert!(matches!(
        tokenless.send_channel_message(42, &json!({})).await,
        Err(MessagingError::MissingToken)
    ));
    Ok(())
}
