use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

/// Explicitly constructed data-store handle. Build once at startup, pass it to the service, and
/// call [`Db::close`] on shutdown.
pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &pinmap_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Builds the pool without opening a connection. The first query connects.
	pub fn connect_lazy(cfg: &pinmap_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect_lazy(&cfg.dsn)?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 7_460_113;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		tracing::debug!("Database schema is up to date.");

		Ok(())
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}
