//! `intfeed-server` entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the store per deploy mode.
//! - Serve until Ctrl+C.

use clap::Parser;
use intfeed_core::{default_log_level, init_logging};
use intfeed_server::{router, AppState, ServerConfig};
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, config.log_dir.as_deref()) {
        eprintln!("intfeed-server: {err}");
        return ExitCode::FAILURE;
    }

    let store = match config.build_store() {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=server_start module=server status=error mode={} error_code=store_init_failed error={err}",
                config.mode
            );
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "event=server_start module=server status=error bind={} error_code=bind_failed error={err}",
                config.bind
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        "event=server_start module=server status=ok bind={} mode={} cors={}",
        config.bind, config.mode, config.cors
    );

    let app = router(AppState::new(store), config.cors);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=server status=error error={err}");
        return ExitCode::FAILURE;
    }

    info!("event=server_stop module=server status=ok");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=server status=error error={err}");
        // Without a signal handler there is nothing to wait for; keep serving.
        std::future::pending::<()>().await;
    }
    info!("event=shutdown_requested module=server status=ok");
}
