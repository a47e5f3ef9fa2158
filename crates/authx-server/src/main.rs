//! AuthX server: application entry point.

use std::process::ExitCode;
use std::time::Duration;

use authx_api::{AppState, build_router};
use authx_auth::AuthError;
use authx_db::{DbError, DbManager};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{ConfigError, LogFormat, ServerConfig};

/// Used when `RUST_LOG` is unset. `tower_http` request traces are
/// emitted at DEBUG.
const DEFAULT_LOG_FILTER: &str = "authx=info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Db(#[from] DbError),

    #[error("auth setup: {0}")]
    Auth(#[from] AuthError),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet.
            eprintln!("authx-server: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => {
            info!("AuthX server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "AuthX server failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    info!(bind_addr = %config.bind_addr, "starting AuthX server");

    let db = DbManager::connect(&config.db).await?;
    let state = AppState::new(db.client().clone(), &config.auth)?;

    if config.reset_purge_interval_secs > 0 {
        tokio::spawn(purge_reset_tokens(
            state.clone(),
            Duration::from_secs(config.reset_purge_interval_secs),
        ));
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Periodic housekeeping. Token validity never depends on it.
async fn purge_reset_tokens(state: AppState, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        if let Err(e) = state.tenant_auth.resets().purge_expired().await {
            warn!(error = %e, "reset token purge failed");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_keeps_request_traces() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string().to_lowercase();
        assert!(rendered.contains("authx=info"));
        assert!(rendered.contains("tower_http=debug"));
    }
}
