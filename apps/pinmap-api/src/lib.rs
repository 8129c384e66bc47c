pub mod routes;
pub mod state;

use std::{future, net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = pinmap_cli::VERSION,
	rename_all = "kebab",
	styles = pinmap_cli::styles(),
)]
pub struct Args {
	/// Path to the TOML configuration file.
	#[arg(long, short = 'c', value_name = "FILE", env = pinmap_cli::CONFIG_ENV)]
	pub config: PathBuf,
}

/// Loads configuration, opens the store and serves HTTP until Ctrl-C. The pool is closed only
/// after in-flight requests have drained.
pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = pinmap_config::load(&args.config)?;

	init_tracing(&config.service.log_level)?;

	let http_addr = config
		.service
		.http_addr()
		.ok_or_else(|| eyre::eyre!("service.http_bind is not a socket address."))?;
	let state = AppState::new(config).await?;

	serve(state.clone(), http_addr).await?;

	state.service.db.close().await;

	tracing::info!("Database pool closed.");

	Ok(())
}

async fn serve(state: AppState, http_addr: SocketAddr) -> color_eyre::Result<()> {
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(listener, routes::router(state)).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("HTTP server stopped.");

	Ok(())
}

fn init_tracing(log_level: &str) -> color_eyre::Result<()> {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).try_init().map_err(|err| eyre::eyre!(err))
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::warn!(error = %err, "Cannot listen for Ctrl-C; serving until the process is killed.");

		future::pending::<()>().await;
	}

	tracing::info!("Shutdown requested.");
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::Args;

	#[test]
	fn config_flag_is_parsed() {
		let args = Args::try_parse_from(["pinmap-api", "--config", "pinmap.toml"])
			.expect("Failed to parse args.");

		assert_eq!(args.config, std::path::PathBuf::from("pinmap.toml"));
	}
}
