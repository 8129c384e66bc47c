use time::OffsetDateTime;
use uuid::Uuid;

use pinmap_domain::{BudgetType, GeoPoint, PlaceFacts, PlaceStatus};

/// Columns selected for every [`Place`] read. Numeric columns are cast to `float8` so they decode
/// into `f64`.
pub const PLACE_COLUMNS: &str = "\
place_id, user_id, name, address, prefecture, lat::float8 AS lat, lng::float8 AS lng, genre, \
genre_parent, genre_child, features, summary, rating::float8 AS rating, review_count, \
price_level, budget_lunch, budget_dinner, google_place_id, status, user_rating, user_note, \
visited_at, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub user_id: String,
	pub email: Option<String>,
	pub display_name: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Place {
	pub place_id: Uuid,
	pub user_id: String,
	pub name: String,
	pub address: Option<String>,
	pub prefecture: Option<String>,
	pub lat: Option<f64>,
	pub lng: Option<f64>,
	pub genre: Option<String>,
	pub genre_parent: Option<String>,
	pub genre_child: Option<String>,
	pub features: Vec<String>,
	pub summary: Option<String>,
	pub rating: Option<f64>,
	pub review_count: Option<i64>,
	pub price_level: Option<i16>,
	pub budget_lunch: Option<String>,
	pub budget_dinner: Option<String>,
	pub google_place_id: Option<String>,
	pub status: String,
	pub user_rating: Option<i16>,
	pub user_note: Option<String>,
	pub visited_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl Place {
	pub fn place_status(&self) -> PlaceStatus {
		self.status.parse().unwrap_or_default()
	}
}
impl PlaceFacts for Place {
	fn place_id(&self) -> Uuid {
		self.place_id
	}

	fn user_id(&self) -> &str {
		&self.user_id
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn genre(&self) -> Option<&str> {
		self.genre.as_deref()
	}

	fn genre_parent(&self) -> Option<&str> {
		self.genre_parent.as_deref()
	}

	fn genre_child(&self) -> Option<&str> {
		self.genre_child.as_deref()
	}

	fn summary(&self) -> Option<&str> {
		self.summary.as_deref()
	}

	fn prefecture(&self) -> Option<&str> {
		self.prefecture.as_deref()
	}

	fn budget_band(&self, kind: BudgetType) -> Option<&str> {
		match kind {
			BudgetType::Lunch => self.budget_lunch.as_deref(),
			BudgetType::Dinner => self.budget_dinner.as_deref(),
		}
	}

	fn features(&self) -> &[String] {
		&self.features
	}

	fn status(&self) -> PlaceStatus {
		self.place_status()
	}

	fn coordinates(&self) -> Option<GeoPoint> {
		match (self.lat, self.lng) {
			(Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
			_ => None,
		}
	}

	fn rating(&self) -> Option<f64> {
		self.rating
	}

	fn review_count(&self) -> Option<i64> {
		self.review_count
	}

	fn user_rating(&self) -> Option<i16> {
		self.user_rating
	}

	fn created_at(&self) -> OffsetDateTime {
		self.created_at
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceList {
	pub list_id: Uuid,
	pub user_id: String,
	pub name: String,
	pub description: Option<String>,
	pub color: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlaceListSummary {
	#[sqlx(flatten)]
	pub list: PlaceList,
	pub place_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListMember {
	#[sqlx(flatten)]
	pub place: Place,
	pub note: Option<String>,
	pub added_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListPlace {
	pub list_id: Uuid,
	pub place_id: Uuid,
	pub note: Option<String>,
	pub added_at: OffsetDateTime,
}
