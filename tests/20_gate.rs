mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::TestApp;

const SCOPED_POSTS: [&str; 5] = [
    "/save-settings",
    "/add-category",
    "/delete-category",
    "/post-panel",
    "/post-panelset",
];

#[tokio::test]
async fn anonymous_session_is_sent_to_login() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();

    browser.get("/dashboard").await?.assert_redirect("/");
    browser.get("/servers").await?.assert_redirect("/");
    browser.get("/select/T1").await?.assert_redirect("/");
    browser.get("/api/dashboard-data").await?.assert_redirect("/");
    for path in SCOPED_POSTS {
        browser.post_form(path, "channel_id=1&name=x").await?.assert_redirect("/");
    }
    Ok(())
}

#[tokio::test]
async fn pending_login_is_still_anonymous() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.start_login().await?;

    browser.get("/dashboard").await?.assert_redirect("/");
    Ok(())
}

#[tokio::test]
async fn unscoped_session_is_sent_to_server_list() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.login().await?;

    browser.get("/dashboard").await?.assert_redirect("/servers");
    for path in SCOPED_POSTS {
        browser.post_form(path, "channel_id=1&name=x").await?.assert_redirect("/servers");
    }
    assert!(app.messenger.sent.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn selecting_a_guild_scopes_the_session() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.login().await?;

    browser.get("/select/T1").await?.assert_redirect("/dashboard");
    let res = browser.get("/dashboard").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Guild ID: T1"));
    assert!(res.body.contains("Tenant One"));
    Ok(())
}

#[tokio::test]
async fn reselecting_switches_guild() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.login().await?;

    browser.get("/select/T1").await?;
    browser.get("/select/T2").await?.assert_redirect("/dashboard");
    let res = browser.get("/dashboard").await?;
    assert!(res.body.contains("Guild ID: T2"));
    Ok(())
}

#[tokio::test]
async fn selecting_an_unmanageable_guild_is_forbidden() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.login().await?;

    // Member without the manage bit, and a guild the operator is not in.
    for id in ["T3", "T999"] {
        let res = browser.get(&format!("/select/{id}")).await?;
        assert_eq!(res.status, StatusCode::FORBIDDEN);
    }
    browser.get("/dashboard").await?.assert_redirect("/servers");

    // A rejected selection keeps an earlier valid one.
    browser.get("/select/T1").await?;
    assert_eq!(browser.get("/select/T3").await?.status, StatusCode::FORBIDDEN);
    assert!(browser.get("/dashboard").await?.body.contains("Guild ID: T1"));
    Ok(())
}

#[tokio::test]
async fn sessions_do_not_leak_between_browsers() -> Result<()> {
    let app = TestApp::builder().build();
    let mut alice = app.browser();
    let mut other = app.browser();

    alice.login().await?;
    alice.get("/select/T1").await?;

    other.get("/dashboard").await?.assert_redirect("/");
    assert_eq!(alice.get("/dashboard").await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn logging_in_again_clears_the_selection() -> Result<()> {
    let app = TestApp::builder().build();
    let mut browser = app.browser();
    browser.login().await?;
    browser.get("/select/T1").await?;

    browser.login().await?;
    browser.get("/dashboard").await?.assert_redirect("/servers");
    Ok(())
}
