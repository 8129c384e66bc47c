use crate::{filter::SearchFilters, place::PlaceFacts};

/// In-memory form of the user-scoped conjunction the storage layer compiles to SQL.
pub fn matches<T>(place: &T, user_id: &str, filters: &SearchFilters) -> bool
where
	T: PlaceFacts,
{
	if place.user_id() != user_id {
		return false;
	}
	if let Some(prefecture) = filters.prefecture.as_deref()
		&& place.prefecture() != Some(prefecture)
	{
		return false;
	}
	if let Some(genre_parent) = filters.genre_parent.as_deref()
		&& place.genre_parent() != Some(genre_parent)
	{
		return false;
	}
	if let Some(genre_child) = filters.genre_child.as_deref()
		&& place.genre_child() != Some(genre_child)
	{
		return false;
	}
	if let Some(budget) = filters.budget.as_ref()
		&& place.budget_band(budget.kind) != Some(budget.band.as_str())
	{
		return false;
	}
	if !contains_all(place.features(), &filters.features) {
		return false;
	}
	if let Some(status) = filters.status
		&& place.status() != status
	{
		return false;
	}
	if let Some(query) = filters.query.as_deref()
		&& !text_matches(place, query)
	{
		return false;
	}

	true
}

/// Superset test: every requested tag must be present on the place.
pub fn contains_all(features: &[String], required: &[String]) -> bool {
	required.iter().all(|tag| features.iter().any(|feature| feature == tag))
}

/// Case-insensitive substring match against name, genre and summary.
pub fn text_matches<T>(place: &T, query: &str) -> bool
where
	T: PlaceFacts,
{
	let needle = query.to_lowercase();

	[Some(place.name()), place.genre(), place.summary()]
		.into_iter()
		.flatten()
		.any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Escapes `\`, `%` and `_` and wraps the result for an `ILIKE ... ESCAPE '\'` substring match.
pub fn like_pattern(query: &str) -> String {
	let mut out = String::with_capacity(query.len() + 2);

	out.push('%');

	for ch in query.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}
