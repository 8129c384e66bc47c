use pinmap_domain::FilterError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Authentication required.")]
	AuthenticationRequired,
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<pinmap_storage::Error> for Error {
	fn from(err: pinmap_storage::Error) -> Self {
		match err {
			pinmap_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			pinmap_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			pinmap_storage::Error::NotFound(message) => Self::NotFound { message },
			pinmap_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<FilterError> for Error {
	fn from(err: FilterError) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
