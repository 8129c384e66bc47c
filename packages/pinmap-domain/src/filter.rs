use serde::{Deserialize, Serialize};

use crate::{
	geo::GeoPoint,
	place::{self, BudgetType, PlaceStatus},
	ranking::SortKey,
};

/// Search filters exactly as a caller sent them. Every field is optional and advisory. Multi-word
/// fields also accept their camelCase names.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawSearchFilters {
	pub location: Option<RawLocation>,
	/// Meters.
	#[serde(alias = "distanceRadius")]
	pub distance_radius: Option<f64>,
	pub prefecture: Option<String>,
	#[serde(alias = "genreParent")]
	pub genre_parent: Option<String>,
	#[serde(alias = "genreChild")]
	pub genre_child: Option<String>,
	#[serde(alias = "budgetType")]
	pub budget_type: Option<String>,
	#[serde(alias = "budgetBand")]
	pub budget_band: Option<String>,
	pub features: Option<Vec<String>>,
	pub status: Option<String>,
	pub query: Option<String>,
	pub sort: Option<String>,
	pub page: Option<i64>,
	pub limit: Option<i64>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawLocation {
	pub lat: f64,
	pub lng: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BudgetFilter {
	pub kind: BudgetType,
	pub band: String,
}

/// Canonical filters with defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchFilters {
	pub origin: Option<GeoPoint>,
	pub radius_m: Option<f64>,
	pub prefecture: Option<String>,
	pub genre_parent: Option<String>,
	pub genre_child: Option<String>,
	pub budget: Option<BudgetFilter>,
	pub features: Vec<String>,
	pub status: Option<PlaceStatus>,
	pub query: Option<String>,
	pub sort: SortKey,
	pub page: u32,
	pub limit: u32,
}
impl SearchFilters {
	/// Filters that match every place of the caller, first page, default sort.
	pub fn unconstrained(cfg: &pinmap_config::Search) -> Self {
		Self {
			origin: None,
			radius_m: None,
			prefecture: None,
			genre_parent: None,
			genre_child: None,
			budget: None,
			features: Vec::new(),
			status: None,
			query: None,
			sort: SortKey::default(),
			page: 1,
			limit: cfg.default_limit.clamp(1, cfg.max_limit.max(1)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
	#[error("{field} must be a finite coordinate pair within latitude ±90 and longitude ±180.")]
	InvalidLocation { field: &'static str },
}

pub fn normalize(
	raw: &RawSearchFilters,
	cfg: &pinmap_config::Search,
) -> Result<SearchFilters, FilterError> {
	let mut filters = SearchFilters::unconstrained(cfg);

	if let Some(location) = raw.location {
		let origin = GeoPoint::new(location.lat, location.lng);

		if !origin.is_valid() {
			return Err(FilterError::InvalidLocation { field: "$.location" });
		}

		filters.origin = Some(origin);
	}

	filters.radius_m = match (filters.origin, raw.distance_radius) {
		(Some(_), Some(radius)) if radius.is_finite() && radius > 0.0 => Some(radius),
		(_, Some(radius)) => {
			tracing::debug!(radius, "Ignoring distance_radius without a usable origin.");

			None
		},
		_ => None,
	};
	filters.prefecture = place::non_blank(raw.prefecture.as_deref());
	filters.genre_parent = place::non_blank(raw.genre_parent.as_deref());
	filters.genre_child = place::non_blank(raw.genre_child.as_deref());
	filters.budget = normalize_budget(raw.budget_type.as_deref(), raw.budget_band.as_deref());
	filters.features = raw.features.as_deref().map(place::normalize_features).unwrap_or_default();
	filters.status = raw.status.as_deref().and_then(|status| match status.parse() {
		Ok(status) => Some(status),
		Err(err) => {
			tracing::debug!(%err, "Ignoring status filter.");

			None
		},
	});
	filters.query = place::non_blank(raw.query.as_deref());
	filters.sort = raw.sort.as_deref().map(SortKey::parse_lenient).unwrap_or_default();
	filters.page = clamp_page(raw.page);
	filters.limit = clamp_limit(raw.limit, cfg);

	Ok(filters)
}

fn normalize_budget(kind: Option<&str>, band: Option<&str>) -> Option<BudgetFilter> {
	let band = place::non_blank(band)?;
	let kind = match kind.map(str::parse::<BudgetType>) {
		Some(Ok(kind)) => kind,
		_ => {
			tracing::debug!(band = band.as_str(), "Ignoring budget_band without a valid budget_type.");

			return None;
		},
	};

	Some(BudgetFilter { kind, band })
}

fn clamp_page(page: Option<i64>) -> u32 {
	match page {
		Some(page) if page >= 1 => u32::try_from(page).unwrap_or(u32::MAX),
		_ => 1,
	}
}

fn clamp_limit(limit: Option<i64>, cfg: &pinmap_config::Search) -> u32 {
	let max = cfg.max_limit.max(1);

	match limit {
		Some(limit) => limit.clamp(1, i64::from(max)) as u32,
		None => cfg.default_limit.clamp(1, max),
	}
}
