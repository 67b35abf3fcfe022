#![warn(clippy::all)]

mod api;
mod database;
mod shopping_list;
mod state;

use std::env;

use tokio::{
    net::TcpListener,
    runtime::Runtime,
    signal::{
        ctrl_c,
        unix::{signal, SignalKind},
    },
};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

use crate::state::AppState;

fn main() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::ACTIVE)
        .pretty();
    let subscriber = Registry::default()
        .with(stdout_log)
        .with(LevelFilter::from_level(Level::INFO));

    tracing::subscriber::set_global_default(subscriber).expect("Unable to set global subscriber");

    let rt = Runtime::new().expect("Unable to create Runtime");
    rt.block_on(serve());
}

async fn serve() {
    let state = AppState::new();

    info!("Starting server...");
    let app = api::router(state);

    let address = env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_owned());
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Unable to bind server address");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutting down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
