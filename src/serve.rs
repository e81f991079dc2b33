//! `parkguide serve`: the built site as static files.

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use clap::Args;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::CliError;

#[cfg(test)]
#[path = "serve_test.rs"]
mod tests;

#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

/// Site files at `/`, directories answered with their `index.html`.
pub(crate) fn router(site_root: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback_service(ServeDir::new(site_root).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

pub(crate) async fn run(site_root: &Path, args: ServeArgs) -> Result<(), CliError> {
    if !site_root.is_dir() {
        return Err(linkgraph::LinkGraphError::NotADirectory(site_root.to_path_buf()).into());
    }
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!(port = args.port, site = %site_root.display(), "park guide listening");
    axum::serve(listener, router(site_root)).await?;
    Ok(())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
