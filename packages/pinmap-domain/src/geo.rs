use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
	pub lat: f64,
	pub lng: f64,
}
impl GeoPoint {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	/// Finite latitude within ±90 and longitude within ±180.
	pub fn is_valid(&self) -> bool {
		self.lat.is_finite()
			&& self.lng.is_finite()
			&& (-90.0..=90.0).contains(&self.lat)
			&& (-180.0..=180.0).contains(&self.lng)
	}
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
	let lat1 = from.lat.to_radians();
	let lat2 = to.lat.to_radians();
	let d_lat = (to.lat - from.lat).to_radians();
	let d_lng = (to.lng - from.lng).to_radians();
	let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
	// Rounding can push `a` a hair outside [0, 1] for antipodal points.
	let a = a.clamp(0.0, 1.0);

	2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance from `origin` to `target`, or `None` when the target has no coordinates.
pub fn distance_km(origin: GeoPoint, target: Option<GeoPoint>) -> Option<f64> {
	target.map(|target| haversine_km(origin, target))
}

/// Radius filtering is best-effort: unknown distances always pass.
pub fn within_radius(distance_km: Option<f64>, radius_m: Option<f64>) -> bool {
	match (distance_km, radius_m) {
		(Some(distance_km), Some(radius_m)) => distance_km * 1_000.0 <= radius_m,
		_ => true,
	}
}

/// Latitude/longitude rectangle that contains every point within a radius of its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	pub min_lat: f64,
	pub max_lat: f64,
	pub min_lng: f64,
	pub max_lng: f64,
}
impl BoundingBox {
	pub fn contains(&self, point: GeoPoint) -> bool {
		(self.min_lat..=self.max_lat).contains(&point.lat)
			&& (self.min_lng..=self.max_lng).contains(&point.lng)
	}
}

/// Conservative prefilter box for a radius search, or `None` when the box would touch a pole or
/// wrap the antimeridian.
pub fn bounding_box(origin: GeoPoint, radius_m: f64) -> Option<BoundingBox> {
	if !origin.is_valid() || !radius_m.is_finite() || radius_m <= 0.0 {
		return None;
	}

	// Slightly more than the true arc length per degree, so the box never clips.
	let lat_delta = (radius_m / 1_000.0 / EARTH_RADIUS_KM).to_degrees() * 1.01;
	let max_abs_lat = origin.lat.abs() + lat_delta;

	if max_abs_lat >= 89.0 {
		return None;
	}

	let lng_delta = lat_delta / max_abs_lat.to_radians().cos();
	let bbox = BoundingBox {
		min_lat: origin.lat - lat_delta,
		max_lat: origin.lat + lat_delta,
		min_lng: origin.lng - lng_delta,
		max_lng: origin.lng + lng_delta,
	};

	if bbox.min_lng < -180.0 || bbox.max_lng > 180.0 {
		return None;
	}

	Some(bbox)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_distance_for_identical_points() {
		let tokyo = GeoPoint::new(35.6812, 139.7671);

		assert_eq!(haversine_km(tokyo, tokyo), 0.0);
	}

	#[test]
	fn one_degree_of_latitude_is_about_111_km() {
		let distance = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));

		assert!((distance - 111.195).abs() < 0.01, "Unexpected distance: {distance}");
	}

	#[test]
	fn antipodal_points_are_half_the_circumference_apart() {
		let distance = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));

		assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
	}

	#[test]
	fn unknown_distance_passes_radius() {
		assert!(within_radius(None, Some(10.0)));
		assert!(within_radius(Some(3.0), None));
		assert!(within_radius(Some(0.5), Some(500.0)));
		assert!(!within_radius(Some(0.501), Some(500.0)));
	}

	#[test]
	fn bounding_box_contains_points_on_the_radius() {
		let origin = GeoPoint::new(35.6812, 139.7671);
		let bbox = bounding_box(origin, 2_000.0).expect("box near Tokyo");

		for bearing in (0..360).step_by(15) {
			let theta = f64::from(bearing).to_radians();
			let d = 2.0 / EARTH_RADIUS_KM;
			let lat1 = origin.lat.to_radians();
			let lng1 = origin.lng.to_radians();
			let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * theta.cos()).asin();
			let lng2 = lng1
				+ (theta.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
			let point = GeoPoint::new(lat2.to_degrees(), lng2.to_degrees());

			assert!(bbox.contains(point), "Point at bearing {bearing} escaped the box.");
		}
	}

	#[test]
	fn bounding_box_is_skipped_near_poles_and_antimeridian() {
		assert_eq!(bounding_box(GeoPoint::new(88.9, 0.0), 50_000.0), None);
		assert_eq!(bounding_box(GeoPoint::new(0.0, 179.99), 5_000.0), None);
		assert_eq!(bounding_box(GeoPoint::new(0.0, 0.0), 0.0), None);
	}

	#[test]
	fn validates_coordinate_ranges() {
		assert!(GeoPoint::new(35.0, 139.0).is_valid());
		assert!(!GeoPoint::new(91.0, 0.0).is_valid());
		assert!(!GeoPoint::new(0.0, -180.5).is_valid());
		assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
	}
}
