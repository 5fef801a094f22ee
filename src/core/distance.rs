use crate::models::{BoundingBox, Coordinates};

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Miles per degree of latitude used for bounding boxes
const MILES_PER_DEGREE: f64 = 69.0;

/// Meters per mile, as expected by provider search radii
pub const METERS_PER_MILE: f64 = 1609.34;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Haversine distance between two coordinate pairs in miles
#[inline]
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    haversine_distance(from.lat, from.lng, to.lat, to.lng)
}

/// Check if `point` lies within `radius_miles` of `center`
#[inline]
pub fn is_within_radius(center: Coordinates, point: Coordinates, radius_miles: f64) -> bool {
    distance_miles(center, point) <= radius_miles
}

/// Calculate a bounding box around a center point
///
/// Cheaper than Haversine for coarse pre-filtering.
/// 1° latitude ≈ 69 miles, 1° longitude ≈ 69 miles * cos(latitude)
///
/// Longitudes may run past ±180 near the antimeridian. A box that reaches a
/// pole spans every longitude.
///
/// # Arguments
/// * `lat` - Center latitude in degrees
/// * `lng` - Center longitude in degrees
/// * `radius_miles` - Radius in miles
pub fn calculate_bounding_box(lat: f64, lng: f64, radius_miles: f64) -> BoundingBox {
    let lat_delta = radius_miles / MILES_PER_DEGREE;
    let min_lat = lat - lat_delta;
    let max_lat = lat + lat_delta;

    // 1 degree longitude shrinks toward the poles
    let lng_delta = radius_miles / (MILES_PER_DEGREE * lat.to_radians().cos().abs());

    if min_lat <= -90.0 || max_lat >= 90.0 || lng_delta >= 180.0 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            min_lng: -180.0,
            max_lng: 180.0,
        };
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lng: lng - lng_delta,
        max_lng: lng + lng_delta,
    }
}

/// Check if a point is within a bounding box
///
/// Longitude is compared as the shortest signed offset from the box's
/// center, so boxes straddling the antimeridian work.
#[inline]
pub fn is_within_bounding_box(lat: f64, lng: f64, bbox: &BoundingBox) -> bool {
    if lat < bbox.min_lat || lat > bbox.max_lat {
        return false;
    }

    let half_span = (bbox.max_lng - bbox.min_lng) / 2.0;
    if half_span >= 180.0 {
        return true;
    }

    let center_lng = bbox.min_lng + half_span;
    longitude_offset(center_lng, lng).abs() <= half_span
}

/// Signed offset from `from` to `to` in degrees, within [-180, 180)
#[inline]
fn longitude_offset(from: f64, to: f64) -> f64 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

/// Round a distance to one decimal place for display
#[inline]
pub fn round_to_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}
