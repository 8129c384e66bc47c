mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Search, Security, Service, Storage};

use std::{fs, path::Path};

/// Hard ceiling for `search.max_limit`.
pub const MAX_PAGE_LIMIT: u32 = 1_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Invalid {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let http_addr = cfg.service.http_addr().ok_or_else(|| Error::Invalid {
		message: "service.http_bind must be a socket address such as 127.0.0.1:8080.".to_string(),
	})?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Invalid {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Invalid {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Invalid {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Invalid {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit > MAX_PAGE_LIMIT {
		return Err(Error::Invalid {
			message: format!("search.max_limit must be {MAX_PAGE_LIMIT} or less."),
		});
	}
	if cfg.search.default_limit > cfg.search.max_limit {
		return Err(Error::Invalid {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.security.api_auth_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
