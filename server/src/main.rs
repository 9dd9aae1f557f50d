mod app;
mod config;
mod error;
mod render;
mod routes;
mod services;
mod state;

use std::process::ExitCode;

use choropleth_shared::{LegendAxis, education_scale, join};
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::services::dataset_loader::{DatasetSources, build_http_client, load_datasets};
use crate::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let built = education_scale().and_then(|scale| LegendAxis::education().map(|axis| (scale, axis)));
    let (scale, axis) = match built {
        Ok(built) => built,
        Err(e) => {
            tracing::error!(error = %e, "invalid classification scale");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        buckets = scale.bucket_count(),
        thresholds = ?scale.thresholds(),
        "classification scale ready"
    );

    let client = match build_http_client() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let sources = DatasetSources::from_env();
    let datasets = match load_datasets(&client, &sources).await {
        Ok(datasets) => datasets,
        Err(e) => {
            tracing::error!(error = %e, dataset = e.dataset(), "failed to load datasets");
            return ExitCode::FAILURE;
        }
    };

    let view = join(&datasets.regions, &datasets.stats, &scale);
    tracing::info!(
        regions = view.regions.len(),
        matched = view.matched(),
        unmatched = view.unmatched(),
        "joined statistics to regions"
    );
    if !view.duplicates.is_empty() {
        tracing::warn!(
            count = view.duplicates.len(),
            first = %view.duplicates[0],
            "duplicate statistics ids, last record kept"
        );
    }

    let document = render::render_map(&view, &scale, &axis);
    tracing::info!(
        svg_bytes = document.svg.len(),
        html_bytes = document.html.len(),
        "rendered map"
    );

    if let Some(path) = config::output_path() {
        return match tokio::fs::write(&path, &document.html).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "wrote map page");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to write map page");
                ExitCode::FAILURE
            }
        };
    }

    let state = AppState::new(&view, document);
    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Choropleth server listening on {addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server shut down gracefully");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
