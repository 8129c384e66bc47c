use std::net::SocketAddr;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Service {
	pub fn http_addr(&self) -> Option<SocketAddr> {
		self.http_bind.trim().parse().ok()
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Page size used when a request does not carry `limit`.
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	/// Upper bound applied to any requested page size.
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { default_limit: default_limit(), max_limit: default_max_limit() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Optional. When set, every `/v1` request must carry `Authorization: Bearer <token>`.
	pub api_auth_token: Option<String>,
}

fn default_limit() -> u32 {
	20
}

fn default_max_limit() -> u32 {
	100
}
