use std::sync::Arc;

use pinmap_service::PinmapService;
use pinmap_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PinmapService>,
}
impl AppState {
	/// Connects to Postgres and applies the schema before serving.
	pub async fn new(config: pinmap_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(PinmapService::new(config, db)))
	}

	pub fn from_service(service: PinmapService) -> Self {
		Self { service: Arc::new(service) }
	}
}
