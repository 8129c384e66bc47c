use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use pinmap_domain::{
	GeoPoint, PlaceStatus, RawLocation,
	place::{self, non_blank},
};
use pinmap_storage::{models::Place, places as store, users};

use crate::{Error, PinmapService, Result, items::PlaceItem};

const MAX_PRICE_LEVEL: i16 = 4;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AddPlaceRequest {
	pub name: String,
	pub address: Option<String>,
	pub prefecture: Option<String>,
	pub location: Option<RawLocation>,
	pub genre: Option<String>,
	pub genre_parent: Option<String>,
	pub genre_child: Option<String>,
	#[serde(default)]
	pub features: Vec<String>,
	pub summary: Option<String>,
	pub rating: Option<f64>,
	pub review_count: Option<i64>,
	pub price_level: Option<i16>,
	pub budget_lunch: Option<String>,
	pub budget_dinner: Option<String>,
	pub google_place_id: Option<String>,
	pub status: Option<PlaceStatus>,
}

/// Absent fields are left unchanged. A blank string clears an optional text field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EditPlaceRequest {
	pub name: Option<String>,
	pub address: Option<String>,
	pub prefecture: Option<String>,
	pub location: Option<RawLocation>,
	pub genre: Option<String>,
	pub genre_parent: Option<String>,
	pub genre_child: Option<String>,
	pub features: Option<Vec<String>>,
	pub summary: Option<String>,
	pub budget_lunch: Option<String>,
	pub budget_dinner: Option<String>,
	pub google_place_id: Option<String>,
}
impl EditPlaceRequest {
	fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.address.is_none()
			&& self.prefecture.is_none()
			&& self.location.is_none()
			&& self.genre.is_none()
			&& self.genre_parent.is_none()
			&& self.genre_child.is_none()
			&& self.features.is_none()
			&& self.summary.is_none()
			&& self.budget_lunch.is_none()
			&& self.budget_dinner.is_none()
			&& self.google_place_id.is_none()
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetStatusRequest {
	pub status: PlaceStatus,
}

/// `user_rating: null` clears the rating. The note is kept when omitted and cleared when blank.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RatePlaceRequest {
	pub user_rating: Option<i16>,
	pub user_note: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlaceDetail {
	#[serde(flatten)]
	pub place: PlaceItem,
	pub list_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletePlaceResponse {
	pub place_id: Uuid,
}

impl PinmapService {
	pub async fn add_place(&self, user_id: &str, req: AddPlaceRequest) -> Result<PlaceDetail> {
		let user_id = crate::caller(user_id)?;
		let Some(name) = non_blank(Some(req.name.as_str())) else {
			return Err(Error::InvalidRequest { message: "name is required.".to_string() });
		};
		let location = parse_location(req.location)?;

		validate_external_facts(req.rating, req.review_count, req.price_level)?;

		let now = OffsetDateTime::now_utc();
		let status = req.status.unwrap_or_default();
		let place = Place {
			place_id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			name,
			address: non_blank(req.address.as_deref()),
			prefecture: non_blank(req.prefecture.as_deref()),
			lat: location.map(|point| point.lat),
			lng: location.map(|point| point.lng),
			genre: non_blank(req.genre.as_deref()),
			genre_parent: non_blank(req.genre_parent.as_deref()),
			genre_child: non_blank(req.genre_child.as_deref()),
			features: place::normalize_features(&req.features),
			summary: non_blank(req.summary.as_deref()),
			rating: req.rating,
			review_count: req.review_count,
			price_level: req.price_level,
			budget_lunch: non_blank(req.budget_lunch.as_deref()),
			budget_dinner: non_blank(req.budget_dinner.as_deref()),
			google_place_id: non_blank(req.google_place_id.as_deref()),
			status: status.as_str().to_string(),
			user_rating: None,
			user_note: None,
			visited_at: (status == PlaceStatus::Visited).then_some(now),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		users::ensure_user(&mut *tx, user_id).await?;

		let stored = store::insert_place(&mut *tx, &place).await?;

		tx.commit().await?;

		tracing::info!(user_id, place_id = %stored.place_id, "Place added.");

		Ok(PlaceDetail { place: PlaceItem::from_place(stored, None), list_ids: Vec::new() })
	}

	pub async fn get_place(&self, user_id: &str, place_id: Uuid) -> Result<PlaceDetail> {
		let user_id = crate::caller(user_id)?;
		let place = store::fetch_place(&self.db.pool, user_id, place_id)
			.await?
			.ok_or_else(place_not_found)?;
		let list_ids = store::list_ids_for_place(&self.db.pool, place_id).await?;

		Ok(PlaceDetail { place: PlaceItem::from_place(place, None), list_ids })
	}

	/// Applies an explicit edit of descriptive fields. Status and personal rating are left alone.
	pub async fn edit_place(
		&self,
		user_id: &str,
		place_id: Uuid,
		req: EditPlaceRequest,
	) -> Result<PlaceDetail> {
		let user_id = crate::caller(user_id)?;

		if req.is_empty() {
			return Err(Error::InvalidRequest { message: "No updates provided.".to_string() });
		}

		let location = parse_location(req.location)?;
		let mut tx = self.db.pool.begin().await?;
		let mut place = load_place_for_update(&mut tx, user_id, place_id).await?;

		if let Some(name) = req.name.as_deref() {
			place.name = non_blank(Some(name)).ok_or_else(|| Error::InvalidRequest {
				message: "name must not be blank.".to_string(),
			})?;
		}
		if let Some(point) = location {
			place.lat = Some(point.lat);
			place.lng = Some(point.lng);
		}
		if let Some(features) = req.features.as_ref() {
			place.features = place::normalize_features(features);
		}

		apply_text(&mut place.address, req.address);
		apply_text(&mut place.prefecture, req.prefecture);
		apply_text(&mut place.genre, req.genre);
		apply_text(&mut place.genre_parent, req.genre_parent);
		apply_text(&mut place.genre_child, req.genre_child);
		apply_text(&mut place.summary, req.summary);
		apply_text(&mut place.budget_lunch, req.budget_lunch);
		apply_text(&mut place.budget_dinner, req.budget_dinner);
		apply_text(&mut place.google_place_id, req.google_place_id);

		place.updated_at = OffsetDateTime::now_utc();

		let stored = store::update_place_details(&mut *tx, &place).await?;
		let list_ids = store::list_ids_for_place(&mut *tx, place_id).await?;

		tx.commit().await?;

		Ok(PlaceDetail { place: PlaceItem::from_place(stored, None), list_ids })
	}

	/// Moving to `visited` stamps the visit time once; moving away clears it.
	pub async fn set_status(
		&self,
		user_id: &str,
		place_id: Uuid,
		req: SetStatusRequest,
	) -> Result<PlaceDetail> {
		let user_id = crate::caller(user_id)?;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut place = load_place_for_update(&mut tx, user_id, place_id).await?;

		place.visited_at = transition_visited_at(req.status, place.visited_at, now);
		place.status = req.status.as_str().to_string();
		place.updated_at = now;

		store::update_place_status(&mut *tx, &place).await?;

		let list_ids = store::list_ids_for_place(&mut *tx, place_id).await?;

		tx.commit().await?;

		Ok(PlaceDetail { place: PlaceItem::from_place(place, None), list_ids })
	}

	pub async fn rate_place(
		&self,
		user_id: &str,
		place_id: Uuid,
		req: RatePlaceRequest,
	) -> Result<PlaceDetail> {
		let user_id = crate::caller(user_id)?;

		if let Some(rating) = req.user_rating
			&& !place::is_valid_user_rating(rating)
		{
			return Err(Error::InvalidRequest {
				message: format!(
					"user_rating must be between {} and {}.",
					place::MIN_USER_RATING,
					place::MAX_USER_RATING
				),
			});
		}

		let mut tx = self.db.pool.begin().await?;
		let mut place = load_place_for_update(&mut tx, user_id, place_id).await?;

		place.user_rating = req.user_rating;

		apply_text(&mut place.user_note, req.user_note);

		place.updated_at = OffsetDateTime::now_utc();

		store::update_place_rating(&mut *tx, &place).await?;

		let list_ids = store::list_ids_for_place(&mut *tx, place_id).await?;

		tx.commit().await?;

		Ok(PlaceDetail { place: PlaceItem::from_place(place, None), list_ids })
	}

	/// Deletes the place together with its list memberships.
	pub async fn delete_place(&self, user_id: &str, place_id: Uuid) -> Result<DeletePlaceResponse> {
		let user_id = crate::caller(user_id)?;

		if !store::delete_place(&self.db.pool, user_id, place_id).await? {
			return Err(place_not_found());
		}

		tracing::info!(user_id, %place_id, "Place deleted.");

		Ok(DeletePlaceResponse { place_id })
	}
}

async fn load_place_for_update(
	tx: &mut Transaction<'_, Postgres>,
	user_id: &str,
	place_id: Uuid,
) -> Result<Place> {
	store::fetch_place_for_update(&mut **tx, user_id, place_id).await?.ok_or_else(place_not_found)
}

fn place_not_found() -> Error {
	Error::NotFound { message: "Place not found.".to_string() }
}

fn parse_location(location: Option<RawLocation>) -> Result<Option<GeoPoint>> {
	let Some(location) = location else { return Ok(None) };
	let point = GeoPoint::new(location.lat, location.lng);

	if !point.is_valid() {
		return Err(Error::InvalidRequest {
			message: "location must have finite lat within ±90 and lng within ±180.".to_string(),
		});
	}

	Ok(Some(point))
}

fn validate_external_facts(
	rating: Option<f64>,
	review_count: Option<i64>,
	price_level: Option<i16>,
) -> Result<()> {
	if let Some(rating) = rating
		&& !place::is_valid_external_rating(rating)
	{
		return Err(Error::InvalidRequest {
			message: format!("rating must be between 0.0 and {:.1}.", place::MAX_EXTERNAL_RATING),
		});
	}
	if review_count.is_some_and(|count| count < 0) {
		return Err(Error::InvalidRequest {
			message: "review_count must not be negative.".to_string(),
		});
	}
	if price_level.is_some_and(|level| !(0..=MAX_PRICE_LEVEL).contains(&level)) {
		return Err(Error::InvalidRequest {
			message: format!("price_level must be between 0 and {MAX_PRICE_LEVEL}."),
		});
	}

	Ok(())
}

fn apply_text(target: &mut Option<String>, update: Option<String>) {
	if let Some(value) = update {
		*target = non_blank(Some(value.as_str()));
	}
}

fn transition_visited_at(
	status: PlaceStatus,
	visited_at: Option<OffsetDateTime>,
	now: OffsetDateTime,
) -> Option<OffsetDateTime> {
	match status {
		PlaceStatus::Visited => visited_at.or(Some(now)),
		PlaceStatus::None | PlaceStatus::WantToGo => None,
	}
}
