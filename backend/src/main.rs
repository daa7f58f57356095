use dotenvy::dotenv;
use axum::{
    routing::{any, get},
    Router,
};
use anyhow::Context;
use tower_http::cors::{CorsLayer, Any};
use tower_http::services::ServeDir;
use tower_http::trace::{TraceLayer, DefaultMakeSpan, DefaultOnResponse};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use std::sync::Arc;

mod handlers {
    pub mod contact_handlers;
    pub mod contact_dtos;
}
mod api {
    pub mod mailer;
}
mod config {
    pub mod settings;
}
mod utils {
    pub mod email_template;
    pub mod sanitize;
}

use api::mailer::{Mailer, SmtpMailer};
use config::settings::Config;
use handlers::contact_handlers;

async fn health_check() -> &'static str {
    "OK"
}

pub struct AppState {
    mailer: Arc<dyn Mailer>,
    recipient: String,
    mail_from: String,
    site_name: String,
}

pub fn build_router(state: Arc<AppState>, static_dir: Option<&str>) -> Router {
    let app = Router::new()
        .route("/api/health", get(health_check))
        // every method reaches the handler so a wrong one gets the JSON 405
        .route("/api/contact", any(contact_handlers::handle_submission))
        .route("/contact.php", any(contact_handlers::handle_submission));

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(Any)
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .expose_headers([axum::http::header::CONTENT_TYPE])
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    let _guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        }))
    });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mailer = SmtpMailer::new(&config.smtp).context("failed to set up SMTP transport")?;
    tracing::info!(
        "Relaying contact submissions to {} via {}:{}",
        config.recipient,
        config.smtp.host,
        config.smtp.port
    );

    let state = Arc::new(AppState {
        mailer: Arc::new(mailer),
        recipient: config.recipient.clone(),
        mail_from: config.mail_from.clone(),
        site_name: config.site_name.clone(),
    });

    let app = build_router(state, config.static_dir.as_deref());

    use tokio::net::TcpListener;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
