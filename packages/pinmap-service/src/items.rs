use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use pinmap_domain::{Candidate, GeoPoint, PlaceFacts, PlaceStatus};
use pinmap_storage::models::Place;

const GOOGLE_MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1";

/// A place as returned by search and list endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct PlaceItem {
	pub place_id: Uuid,
	pub name: String,
	pub address: Option<String>,
	pub prefecture: Option<String>,
	pub location: Option<GeoPoint>,
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
	pub user_rating: Option<i16>,
	pub user_note: Option<String>,
	pub status: PlaceStatus,
	#[serde(with = "time::serde::rfc3339::option")]
	pub visited_at: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	pub google_maps_url: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distance_km: Option<f64>,
}
impl PlaceItem {
	pub fn from_place(place: Place, distance_km: Option<f64>) -> Self {
		let google_maps_url = google_maps_url(&place);
		let location = place.coordinates();
		let status = place.place_status();

		Self {
			place_id: place.place_id,
			name: place.name,
			address: place.address,
			prefecture: place.prefecture,
			location,
			genre: place.genre,
			genre_parent: place.genre_parent,
			genre_child: place.genre_child,
			features: place.features,
			summary: place.summary,
			rating: place.rating,
			review_count: place.review_count,
			price_level: place.price_level,
			budget_lunch: place.budget_lunch,
			budget_dinner: place.budget_dinner,
			user_rating: place.user_rating,
			user_note: place.user_note,
			status,
			visited_at: place.visited_at,
			created_at: place.created_at,
			updated_at: place.updated_at,
			google_maps_url,
			distance_km,
		}
	}
}
impl From<Candidate<Place>> for PlaceItem {
	fn from(candidate: Candidate<Place>) -> Self {
		Self::from_place(candidate.place, candidate.distance_km)
	}
}

/// Deep link that opens the place in Google Maps. Coordinates win over the name and address when
/// both are known.
pub fn google_maps_url(place: &Place) -> String {
	let mut url = match place.coordinates() {
		Some(point) => format!("{GOOGLE_MAPS_SEARCH_URL}&query={},{}", point.lat, point.lng),
		None => {
			let query = match place.address.as_deref() {
				Some(address) => format!("{} {address}", place.name),
				None => place.name.clone(),
			};

			format!("{GOOGLE_MAPS_SEARCH_URL}&query={}", urlencoding::encode(&query))
		},
	};

	if let Some(google_place_id) = place.google_place_id.as_deref() {
		url.push_str("&query_place_id=");
		url.push_str(&urlencoding::encode(google_place_id));
	}

	url
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	fn place() -> Place {
		let now = datetime!(2026-04-01 09:30 UTC);

		Place {
			place_id: Uuid::nil(),
			user_id: "user-a".to_string(),
			name: "Kanda Matsuya".to_string(),
			address: Some("1-13 Kanda Sudacho".to_string()),
			prefecture: Some("13".to_string()),
			lat: None,
			lng: None,
			genre: Some("Soba".to_string()),
			genre_parent: None,
			genre_child: None,
			features: Vec::new(),
			summary: None,
			rating: Some(4.1),
			review_count: Some(812),
			price_level: Some(1),
			budget_lunch: None,
			budget_dinner: None,
			google_place_id: None,
			status: "want_to_go".to_string(),
			user_rating: None,
			user_note: None,
			visited_at: None,
			created_at: now,
			updated_at: now,
		}
	}

	#[test]
	fn maps_url_prefers_coordinates() {
		let mut place = place();

		place.lat = Some(35.6944);
		place.lng = Some(139.7691);

		assert_eq!(
			google_maps_url(&place),
			"https://www.google.com/maps/search/?api=1&query=35.6944,139.7691"
		);
	}

	#[test]
	fn maps_url_falls_back_to_encoded_name_and_address() {
		assert_eq!(
			google_maps_url(&place()),
			"https://www.google.com/maps/search/?api=1&query=Kanda%20Matsuya%201-13%20Kanda%20Sudacho"
		);
	}

	#[test]
	fn maps_url_appends_the_google_place_id() {
		let mut place = place();

		place.address = None;
		place.google_place_id = Some("ChIJ8T1GpMGOGGARDYGSgpoOdfg".to_string());

		assert_eq!(
			google_maps_url(&place),
			"https://www.google.com/maps/search/?api=1&query=Kanda%20Matsuya&query_place_id=ChIJ8T1GpMGOGGARDYGSgpoOdfg"
		);
	}

	#[test]
	fn distance_is_only_serialized_when_known() {
		let without = serde_json::to_value(PlaceItem::from_place(place(), None))
			.expect("Failed to serialize item.");

		assert!(without.get("distance_km").is_none());
		assert_eq!(without["status"], "want_to_go");
		assert_eq!(without["created_at"], "2026-04-01T09:30:00Z");
		assert!(without["visited_at"].is_null());

		let with = serde_json::to_value(PlaceItem::from_place(place(), Some(0.42)))
			.expect("Failed to serialize item.");

		assert_eq!(with["distance_km"], 0.42);
	}
}
