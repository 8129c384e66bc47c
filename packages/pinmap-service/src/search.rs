use serde::Serialize;

use pinmap_domain::{RawSearchFilters, filter};
use pinmap_storage::search as store;

use crate::{PinmapService, Result, items::PlaceItem};

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub places: Vec<PlaceItem>,
	pub total: usize,
	pub page: u32,
	pub limit: u32,
	#[serde(rename = "hasMore")]
	pub has_more: bool,
}

impl PinmapService {
	/// Finds the caller's places matching every supplied filter, ranked and sliced into one page.
	/// An empty result is not an error.
	pub async fn search(&self, user_id: &str, req: RawSearchFilters) -> Result<SearchResponse> {
		let user_id = crate::caller(user_id)?;
		let filters = filter::normalize(&req, &self.cfg.search)?;
		let candidates = store::fetch_candidates(&self.db.pool, user_id, &filters).await?;
		let fetched = candidates.len();
		let page = pinmap_domain::search::rank_and_page(candidates, &filters);

		tracing::debug!(
			user_id,
			fetched,
			total = page.total,
			sort = filters.sort.as_str(),
			page = filters.page,
			limit = filters.limit,
			"Place search ranked."
		);

		let page = page.map(PlaceItem::from);

		Ok(SearchResponse {
			places: page.items,
			total: page.total,
			page: page.page,
			limit: page.limit,
			has_more: page.has_more,
		})
	}
}
