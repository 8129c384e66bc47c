use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::place::{PlaceFacts, UnknownVariant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
	#[default]
	Recommended,
	Distance,
	Rating,
	Reviews,
	New,
}
impl SortKey {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Recommended => "recommended",
			Self::Distance => "distance",
			Self::Rating => "rating",
			Self::Reviews => "reviews",
			Self::New => "new",
		}
	}

	/// Unknown keys fall back to [`SortKey::Recommended`].
	pub fn parse_lenient(raw: &str) -> Self {
		raw.parse().unwrap_or_else(|err: UnknownVariant| {
			tracing::debug!(%err, "Falling back to recommended sort.");

			Self::Recommended
		})
	}
}
impl FromStr for SortKey {
	type Err = UnknownVariant;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim() {
			"recommended" => Ok(Self::Recommended),
			"distance" => Ok(Self::Distance),
			"rating" => Ok(Self::Rating),
			"reviews" => Ok(Self::Reviews),
			"new" => Ok(Self::New),
			other => Err(UnknownVariant { kind: "sort", value: other.to_string() }),
		}
	}
}

/// A fetched place together with its distance from the search origin.
#[derive(Clone, Debug)]
pub struct Candidate<T> {
	pub place: T,
	pub distance_km: Option<f64>,
}

/// Sorts candidates in place. Equal keys resolve by ascending place id so repeated calls over the
/// same candidate set page identically.
pub fn rank<T>(candidates: &mut [Candidate<T>], sort: SortKey)
where
	T: PlaceFacts,
{
	candidates.sort_by(|a, b| compare(a, b, sort));
}

pub fn compare<T>(a: &Candidate<T>, b: &Candidate<T>, sort: SortKey) -> Ordering
where
	T: PlaceFacts,
{
	let primary = match sort {
		SortKey::Recommended => cmp_desc_nulls_last(a.place.user_rating(), b.place.user_rating())
			.then_with(|| cmp_f64_desc_nulls_last(a.place.rating(), b.place.rating()))
			.then_with(|| b.place.created_at().cmp(&a.place.created_at())),
		SortKey::Distance => cmp_f64_asc_nulls_last(a.distance_km, b.distance_km),
		SortKey::Rating => cmp_f64_desc_nulls_last(a.place.rating(), b.place.rating()),
		SortKey::Reviews => cmp_desc_nulls_last(a.place.review_count(), b.place.review_count())
			.then_with(|| cmp_f64_desc_nulls_last(a.place.rating(), b.place.rating())),
		SortKey::New => b.place.created_at().cmp(&a.place.created_at()),
	};

	primary.then_with(|| a.place.place_id().cmp(&b.place.place_id()))
}

fn cmp_desc_nulls_last<K>(a: Option<K>, b: Option<K>) -> Ordering
where
	K: Ord,
{
	match (a, b) {
		(Some(a), Some(b)) => b.cmp(&a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn cmp_f64_desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => b.total_cmp(&a),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn cmp_f64_asc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => a.total_cmp(&b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
