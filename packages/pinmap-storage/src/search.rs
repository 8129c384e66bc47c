use sqlx::{PgExecutor, Postgres, QueryBuilder};

use pinmap_domain::{BudgetType, SearchFilters, geo, predicate};

use crate::{
	Result,
	models::{PLACE_COLUMNS, Place},
};

/// Builds the user-scoped conjunction for a search. Omitted filter dimensions add no predicate.
/// The result is unordered; ranking happens after distances are known.
pub fn candidate_query(user_id: &str, filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new(format!("SELECT {PLACE_COLUMNS} FROM places WHERE user_id = "));

	builder.push_bind(user_id.to_string());

	if let Some(prefecture) = filters.prefecture.as_ref() {
		builder.push(" AND prefecture = ");
		builder.push_bind(prefecture.clone());
	}
	if let Some(genre_parent) = filters.genre_parent.as_ref() {
		builder.push(" AND genre_parent = ");
		builder.push_bind(genre_parent.clone());
	}
	if let Some(genre_child) = filters.genre_child.as_ref() {
		builder.push(" AND genre_child = ");
		builder.push_bind(genre_child.clone());
	}
	if let Some(budget) = filters.budget.as_ref() {
		builder.push(match budget.kind {
			BudgetType::Lunch => " AND budget_lunch = ",
			BudgetType::Dinner => " AND budget_dinner = ",
		});
		builder.push_bind(budget.band.clone());
	}
	if !filters.features.is_empty() {
		builder.push(" AND features @> ");
		builder.push_bind(filters.features.clone());
	}
	if let Some(status) = filters.status {
		builder.push(" AND status = ");
		builder.push_bind(status.as_str());
	}
	if let Some(query) = filters.query.as_deref() {
		let pattern = predicate::like_pattern(query);

		builder.push(" AND (name ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" ESCAPE '\\' OR genre ILIKE ");
		builder.push_bind(pattern.clone());
		builder.push(" ESCAPE '\\' OR summary ILIKE ");
		builder.push_bind(pattern);
		builder.push(" ESCAPE '\\')");
	}
	// Coarse prefilter only. Places without coordinates always pass, and the exact radius check
	// runs after distances are computed.
	if let (Some(origin), Some(radius_m)) = (filters.origin, filters.radius_m)
		&& let Some(bbox) = geo::bounding_box(origin, radius_m)
	{
		builder.push(" AND (lat IS NULL OR (lat BETWEEN ");
		builder.push_bind(bbox.min_lat);
		builder.push(" AND ");
		builder.push_bind(bbox.max_lat);
		builder.push(" AND lng BETWEEN ");
		builder.push_bind(bbox.min_lng);
		builder.push(" AND ");
		builder.push_bind(bbox.max_lng);
		builder.push("))");
	}

	builder
}

pub async fn fetch_candidates<'e, E>(
	executor: E,
	user_id: &str,
	filters: &SearchFilters,
) -> Result<Vec<Place>>
where
	E: PgExecutor<'e>,
{
	let mut builder = candidate_query(user_id, filters);
	let places = builder.build_query_as::<Place>().fetch_all(executor).await?;

	tracing::debug!(user_id, candidates = places.len(), "Fetched search candidates.");

	Ok(places)
}

#[cfg(test)]
mod tests {
	use pinmap_domain::{BudgetFilter, GeoPoint, PlaceStatus};

	use super::*;

	fn filters() -> SearchFilters {
		SearchFilters::unconstrained(&pinmap_config::Search { default_limit: 20, max_limit: 100 })
	}

	#[test]
	fn unconstrained_query_is_scoped_to_the_user_only() {
		let builder = candidate_query("user-a", &filters());
		let sql = builder.sql();

		assert!(sql.ends_with("FROM places WHERE user_id = $1"), "Unexpected SQL: {sql}");
	}

	#[test]
	fn every_dimension_adds_one_predicate() {
		let mut filters = filters();

		filters.prefecture = Some("13".to_string());
		filters.genre_parent = Some("G001".to_string());
		filters.genre_child = Some("G001-3".to_string());
		filters.budget = Some(BudgetFilter { kind: BudgetType::Lunch, band: "B001".to_string() });
		filters.features = vec!["private room".to_string(), "terrace".to_string()];
		filters.status = Some(PlaceStatus::Visited);
		filters.query = Some("soba".to_string());

		let builder = candidate_query("user-a", &filters);
		let sql = builder.sql();

		for fragment in [
			"user_id = $1",
			"prefecture = $2",
			"genre_parent = $3",
			"genre_child = $4",
			"budget_lunch = $5",
			"features @> $6",
			"status = $7",
			"name ILIKE $8 ESCAPE '\\'",
			"genre ILIKE $9 ESCAPE '\\'",
			"summary ILIKE $10 ESCAPE '\\'",
		] {
			assert!(sql.contains(fragment), "Missing {fragment:?} in {sql}");
		}

		assert!(!sql.contains("budget_dinner"));
		assert!(!sql.contains("lat BETWEEN"));
	}

	#[test]
	fn radius_adds_a_bounding_box_that_keeps_unknown_coordinates() {
		let mut filters = filters();

		filters.origin = Some(GeoPoint::new(35.6812, 139.7671));
		filters.radius_m = Some(1_000.0);

		let builder = candidate_query("user-a", &filters);
		let sql = builder.sql();

		assert!(sql.contains("lat IS NULL OR (lat BETWEEN $2 AND $3 AND lng BETWEEN $4 AND $5)"));
	}
}
