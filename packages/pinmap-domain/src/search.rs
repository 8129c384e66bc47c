use crate::{
	filter::SearchFilters,
	geo,
	page::{self, Page},
	place::PlaceFacts,
	ranking::{self, Candidate},
};

/// Runs the in-memory stages over places already narrowed by the storage predicates: distance,
/// radius filtering, ranking and pagination.
pub fn rank_and_page<T>(places: Vec<T>, filters: &SearchFilters) -> Page<Candidate<T>>
where
	T: PlaceFacts,
{
	let fetched = places.len();
	let mut candidates = attach_distances(places, filters);

	candidates.retain(|candidate| geo::within_radius(candidate.distance_km, filters.radius_m));

	tracing::debug!(
		fetched,
		within_radius = candidates.len(),
		sort = filters.sort.as_str(),
		"Ranking place candidates."
	);

	ranking::rank(&mut candidates, filters.sort);

	page::paginate(candidates, filters.page, filters.limit)
}

pub fn attach_distances<T>(places: Vec<T>, filters: &SearchFilters) -> Vec<Candidate<T>>
where
	T: PlaceFacts,
{
	places
		.into_iter()
		.map(|place| {
			let distance_km =
				filters.origin.and_then(|origin| geo::distance_km(origin, place.coordinates()));

			Candidate { place, distance_km }
		})
		.collect()
}
