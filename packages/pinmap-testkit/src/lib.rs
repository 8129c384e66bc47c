//! Scratch Postgres databases for integration tests.
//!
//! Every test gets a database of its own, created next to the one named by `PINMAP_PG_DSN` and
//! dropped when the test is done. Dropping uses `WITH (FORCE)`, so Postgres 13 or newer is needed.

mod error;

pub use error::{Error, Result};

use std::{env, future::Future, mem, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "PINMAP_PG_DSN";

const NAME_PREFIX: &str = "pinmap_test_";
const MAINTENANCE_DATABASES: &[&str] = &["postgres", "template1"];

pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("{DSN_ENV} is not a valid DSN: {err}.")))?;
		let (maintenance, mut conn) = open_maintenance(&base).await?;
		let name = scratch_name();
		let create = format!("CREATE DATABASE {}", quote_ident(&name));

		sqlx::query(&create)
			.execute(&mut conn)
			.await
			.map_err(|err| Error::Message(format!("Failed to create {name}: {err}.")))?;
		conn.close().await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Drops the database now instead of on `Drop`, surfacing any failure.
	pub async fn cleanup(mut self) -> Result<()> {
		self.drop_now().await
	}

	async fn drop_now(&mut self) -> Result<()> {
		if self.dropped {
			return Ok(());
		}

		drop_database(&self.maintenance, &self.name).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		// The caller's runtime may already be shutting down, so drop from a private one.
		let name = mem::take(&mut self.name);
		let maintenance = self.maintenance.clone();
		let outcome = thread::spawn(move || -> Result<()> {
			let runtime = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(format!("Failed to start cleanup runtime: {err}.")))?;

			runtime.block_on(drop_database(&maintenance, &name))
		})
		.join();

		match outcome {
			Ok(Ok(())) => {},
			Ok(Err(err)) => eprintln!("Test database cleanup failed: {err}."),
			Err(_) => eprintln!("Test database cleanup panicked."),
		}
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// Runs `f` with the DSN of a scratch database and drops the database afterwards. A cleanup
/// failure is reported only when `f` itself succeeded.
pub async fn with_test_db<F, Fut, T>(base_dsn: &str, f: F) -> Result<T>
where
	F: FnOnce(String) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let mut db = TestDatabase::new(base_dsn).await?;
	let outcome = f(db.dsn.clone()).await;
	let cleanup = db.drop_now().await;

	match (outcome, cleanup) {
		(Ok(value), Ok(())) => Ok(value),
		(Ok(_), Err(err)) => Err(err),
		(Err(err), cleanup) => {
			if let Err(cleanup_err) = cleanup {
				eprintln!("Test database cleanup failed: {cleanup_err}.");
			}

			Err(err)
		},
	}
}

fn scratch_name() -> String {
	format!("{NAME_PREFIX}{}", Uuid::new_v4().simple())
}

fn quote_ident(ident: &str) -> String {
	format!("\"{}\"", ident.replace('"', "\"\""))
}

async fn open_maintenance(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failures = Vec::new();

	for database in MAINTENANCE_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("No maintenance database is reachable ({}).", failures.join("; "))))
}

async fn drop_database(maintenance: &PgConnectOptions, name: &str) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;
	let drop = format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", quote_ident(name));

	sqlx::query(&drop).execute(&mut conn).await?;
	conn.close().await?;

	Ok(())
}
