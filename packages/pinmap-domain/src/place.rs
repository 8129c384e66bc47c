use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::geo::GeoPoint;

pub const MIN_USER_RATING: i16 = 1;
pub const MAX_USER_RATING: i16 = 5;
pub const MAX_EXTERNAL_RATING: f64 = 5.0;

/// The caller's relationship to a saved place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceStatus {
	#[default]
	None,
	WantToGo,
	Visited,
}
impl PlaceStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::WantToGo => "want_to_go",
			Self::Visited => "visited",
		}
	}
}
impl FromStr for PlaceStatus {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim() {
			"none" => Ok(Self::None),
			"want_to_go" => Ok(Self::WantToGo),
			"visited" => Ok(Self::Visited),
			other => Err(UnknownVariant { kind: "status", value: other.to_string() }),
		}
	}
}
impl fmt::Display for PlaceStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Which meal a budget band refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetType {
	Lunch,
	Dinner,
}
impl BudgetType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Lunch => "lunch",
			Self::Dinner => "dinner",
		}
	}
}
impl FromStr for BudgetType {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim() {
			"lunch" => Ok(Self::Lunch),
			"dinner" => Ok(Self::Dinner),
			other => Err(UnknownVariant { kind: "budget_type", value: other.to_string() }),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value '{value}'.")]
pub struct UnknownVariant {
	pub kind: &'static str,
	pub value: String,
}

/// Read access to the attributes search needs from a stored place.
pub trait PlaceFacts {
	fn place_id(&self) -> Uuid;

	fn user_id(&self) -> &str;

	fn name(&self) -> &str;

	fn genre(&self) -> Option<&str>;

	fn genre_parent(&self) -> Option<&str>;

	fn genre_child(&self) -> Option<&str>;

	fn summary(&self) -> Option<&str>;

	fn prefecture(&self) -> Option<&str>;

	fn budget_band(&self, kind: BudgetType) -> Option<&str>;

	fn features(&self) -> &[String];

	fn status(&self) -> PlaceStatus;

	fn coordinates(&self) -> Option<GeoPoint>;

	fn rating(&self) -> Option<f64>;

	fn review_count(&self) -> Option<i64>;

	fn user_rating(&self) -> Option<i16>;

	fn created_at(&self) -> OffsetDateTime;
}

/// Trims feature tags, drops blank ones and keeps the first occurrence of each tag.
pub fn normalize_features<I, S>(features: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for feature in features {
		let trimmed = feature.as_ref().trim();

		if trimmed.is_empty() || !seen.insert(trimmed.to_string()) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	out
}

pub fn is_valid_user_rating(rating: i16) -> bool {
	(MIN_USER_RATING..=MAX_USER_RATING).contains(&rating)
}

pub fn is_valid_external_rating(rating: f64) -> bool {
	rating.is_finite() && (0.0..=MAX_EXTERNAL_RATING).contains(&rating)
}

/// Returns `None` for absent or whitespace-only input, otherwise the trimmed value.
pub fn non_blank(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_round_trips_through_strings() {
		for status in [PlaceStatus::None, PlaceStatus::WantToGo, PlaceStatus::Visited] {
			assert_eq!(status.as_str().parse::<PlaceStatus>(), Ok(status));
		}

		assert!("been_there".parse::<PlaceStatus>().is_err());
	}

	#[test]
	fn features_are_trimmed_and_deduplicated_in_order() {
		let features = normalize_features([" private room", "terrace", "", "private room ", "wifi"]);

		assert_eq!(features, vec!["private room", "terrace", "wifi"]);
	}

	#[test]
	fn rating_bounds() {
		assert!(is_valid_user_rating(1));
		assert!(is_valid_user_rating(5));
		assert!(!is_valid_user_rating(0));
		assert!(!is_valid_user_rating(6));
		assert!(is_valid_external_rating(4.2));
		assert!(!is_valid_external_rating(5.1));
		assert!(!is_valid_external_rating(f64::NAN));
	}
}
