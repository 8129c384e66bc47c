use serde::Serialize;

/// One page of a ranked result set.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	/// Size of the full ranked set before slicing.
	pub total: usize,
	pub page: u32,
	pub limit: u32,
	pub has_more: bool,
}
impl<T> Page<T> {
	pub fn map<U, F>(self, f: F) -> Page<U>
	where
		F: FnMut(T) -> U,
	{
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			page: self.page,
			limit: self.limit,
			has_more: self.has_more,
		}
	}
}

/// Returns items `[(page - 1) * limit, page * limit)`; `page` is 1-based. A page past the end is
/// empty and reports no further pages.
pub fn paginate<T>(ranked: Vec<T>, page: u32, limit: u32) -> Page<T> {
	let page = page.max(1);
	let limit = limit.max(1);
	let total = ranked.len();
	let start = (page as usize - 1).saturating_mul(limit as usize);
	let end = (page as usize).saturating_mul(limit as usize);
	let items = if start >= total {
		Vec::new()
	} else {
		ranked.into_iter().skip(start).take(end.min(total) - start).collect()
	};

	Page { items, total, page, limit, has_more: end < total }
}
