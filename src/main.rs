mod entity;
mod error;
mod handlers;
mod prelude;
mod state;
mod sv;
mod utils;

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::{
  Router,
  routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{prelude::*, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "commissions=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url = env::var("DATABASE_URL")
    .unwrap_or_else(|_| "sqlite:commissions.db?mode=rwc".into());

  info!("Starting Commissions Server v{}", env!("CARGO_PKG_VERSION"));

  let app_state =
    Arc::new(AppState::new(&db_url).await.context("Failed to init state")?);
  let port = app_state.config.port;

  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(2)
      .burst_size(100)
      .finish()
      .context("Failed to build rate limiter config")?,
  );

  let governor_limiter = governor_conf.limiter().clone();

  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      governor_limiter.retain_recent();
    }
  });

  let app = Router::new()
    .route("/health", get(handlers::health))
    .route("/api/sales", post(handlers::create_sale))
    .route("/api/sales/{id}/recalculate", post(handlers::recalculate_sale))
    .route("/api/sales/{id}/commission", put(handlers::override_commission))
    .route("/api/sellers/{id}/sales", get(handlers::list_seller_sales))
    .route("/api/operators/{id}/settings", get(handlers::operator_settings))
    .route("/api/settings", post(handlers::create_setting))
    .route(
      "/api/settings/{id}",
      put(handlers::update_setting).delete(handlers::delete_setting),
    )
    .route("/api/settings/{id}/rules", post(handlers::create_rule))
    .route(
      "/api/rules/{id}",
      put(handlers::update_rule).delete(handlers::delete_rule),
    )
    .route(
      "/api/rules/{id}/power-values",
      put(handlers::replace_power_values),
    )
    .route("/api/reports/dashboard", get(handlers::dashboard))
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app_state)
    .into_make_service_with_connect_info::<SocketAddr>();

  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  info!("HTTP server listening on {}", addr);

  let listener =
    tokio::net::TcpListener::bind(addr).await.context("Failed to bind")?;
  axum::serve(listener, app).await.context("Server error")?;

  Ok(())
}
