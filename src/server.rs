use std::time::Duration;

use axum::{middleware, routing::get, routing::post, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::handlers::{protected, public, scoped};
use crate::middleware::{require_operator, require_scoped_tenant};

/// Full router: public routes, operator routes behind `require_operator`, and
/// guild routes behind `require_scoped_tenant`.
pub fn app(ctx: AppContext) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(ctx.clone()))
        .merge(scoped_routes(ctx.clone()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(ctx)
}

fn public_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(public::index_get))
        .route("/health", get(public::health_get))
        .route("/auth/login", get(public::login_get))
        .route("/auth/callback", get(public::callback_get))
        .route("/auth/logout", get(public::logout_get))
        .route("/invite/:guild_id", get(public::invite_get))
}

fn protected_routes(ctx: AppContext) -> Router<AppContext> {
    Router::new()
        .route("/servers", get(protected::servers_get))
        .route("/select/:guild_id", get(protected::select_get))
        .route("/api/dashboard-data", get(protected::dashboard_data_get))
        .route_layer(middleware::from_fn_with_state(ctx, require_operator))
}

fn scoped_routes(ctx: AppContext) -> Router<AppContext> {
    Router::new()
        .route("/dashboard", get(scoped::dashboard_get))
        .route("/save-settings", post(scoped::save_settings_post))
        .route("/add-category", post(scoped::add_category_post))
        .route("/delete-category", post(scoped::delete_category_post))
        .route("/post-panel", post(scoped::post_panel_post))
        .route("/post-panelset", post(scoped::post_panelset_post))
        .route_layer(middleware::from_fn_with_state(ctx, require_scoped_tenant))
}

/// Bind the configured address and serve until the process stops.
pub async fn serve(ctx: AppContext) -> std::io::Result<()> {
    let bind_addr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Ticket dashboard listening on http://{}", bind_addr);

    let sweep_every = Duration::from_secs(ctx.config.session.sweep_interval_secs);
    let _sweeper = ctx.sessions.spawn_sweeper(sweep_every);

    axum::serve(listener, app(ctx)).await
}
