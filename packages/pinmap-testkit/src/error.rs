pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Setup or cleanup failed in a way that carries its own explanation.
	#[error("{0}")]
	Message(String),
	#[error("Postgres error: {0}")]
	Sqlx(#[from] sqlx::Error),
}
