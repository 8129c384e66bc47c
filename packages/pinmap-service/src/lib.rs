//! Place search and curation operations on top of the storage layer.

pub mod error;
pub mod items;
pub mod lists;
pub mod places;
pub mod search;

pub use error::{Error, Result};
pub use items::{PlaceItem, google_maps_url};
pub use lists::{
	AddToListRequest, CreateListRequest, DeleteListResponse, ListItem, ListMemberItem,
	ListPlacesResponse, ListsResponse, MembershipResponse, RemoveFromListResponse,
	UpdateListRequest,
};
pub use places::{
	AddPlaceRequest, DeletePlaceResponse, EditPlaceRequest, PlaceDetail, RatePlaceRequest,
	SetStatusRequest,
};
pub use search::SearchResponse;

use pinmap_config::Config;
use pinmap_storage::db::Db;

pub struct PinmapService {
	pub cfg: Config,
	pub db: Db,
}
impl PinmapService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}
}

/// Resolves the caller forwarded by the upstream auth layer. A blank id means nobody is signed in.
pub fn caller(user_id: &str) -> Result<&str> {
	let user_id = user_id.trim();

	if user_id.is_empty() {
		return Err(Error::AuthenticationRequired);
	}

	Ok(user_id)
}
