use std::{io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Why a Pinmap config file could not be turned into a usable [`crate::Config`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot read the Pinmap config at {path:?}: {source}")]
	Read { path: PathBuf, source: io::Error },
	#[error("The Pinmap config at {path:?} is not valid TOML: {source}")]
	Parse { path: PathBuf, source: toml::de::Error },
	#[error("Invalid Pinmap config: {message}")]
	Invalid { message: String },
}
