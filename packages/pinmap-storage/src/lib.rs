pub mod db;
pub mod lists;
pub mod models;
pub mod places;
pub mod schema;
pub mod search;
pub mod users;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
