use crate::models::{BoundingBox, GeoPoint};

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude, used for bounding boxes
const KM_PER_DEGREE: f64 = 111.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers
///
/// Inputs must already be validated; out-of-range angles give meaningless
/// results.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push antipodal points a hair above 1
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points in kilometers
#[inline]
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance(a.lat, a.lng, b.lat, b.lng)
}

/// Calculate a bounding box around a center point
///
/// Used by the ride index as a cheap pre-scan before the exact haversine
/// test. The box is a superset of the radius: near the poles or across the
/// antimeridian it widens to the full longitude range rather than wrap.
pub fn calculate_bounding_box(lat: f64, lon: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE;
    let min_lat = (lat - lat_delta).max(-90.0);
    let max_lat = (lat + lat_delta).min(90.0);

    // 1 degree longitude shrinks with latitude; use the widest latitude in the box
    let widest_lat = min_lat.abs().max(max_lat.abs());
    let cos_lat = widest_lat.to_radians().cos();

    let (min_lon, max_lon) = if cos_lat <= f64::EPSILON {
        (-180.0, 180.0)
    } else {
        let lon_delta = radius_km / (KM_PER_DEGREE * cos_lat);
        if lon - lon_delta < -180.0 || lon + lon_delta > 180.0 {
            (-180.0, 180.0)
        } else {
            (lon - lon_delta, lon + lon_delta)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

/// Check if a point is within a bounding box
#[inline]
pub fn is_within_bounding_box(lat: f64, lon: f64, bbox: &BoundingBox) -> bool {
    lat >= bbox.min_lat && lat <= bbox.max_lat && lon >= bbox.min_lon && lon <= bbox.max_lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_same_point_is_zero() {
        let p = GeoPoint::new(12.9716, 77.5946);
        assert_eq!(distance_km(&p, &p), 0.0);
    }

    #[test]
    fn test_pole_to_pole() {
        let north = GeoPoint::new(90.0, 0.0);
        let south = GeoPoint::new(-90.0, 0.0);
        let distance = distance_km(&north, &south);
        assert!((distance - 20015.0).abs() < 200.0, "got {}", distance);
    }

    #[test]
    fn test_symmetric() {
        let a = GeoPoint::new(12.90, 77.60);
        let b = GeoPoint::new(28.61, 77.20);
        assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box() {
        let bbox = calculate_bounding_box(12.9716, 77.5946, 10.0);

        assert!(bbox.min_lat < 12.9716);
        assert!(bbox.max_lat > 12.9716);
        assert!(bbox.min_lon < 77.5946);
        assert!(bbox.max_lon > 77.5946);

        // 20km / 111km per degree = ~0.18 degrees
        let lat_span = bbox.max_lat - bbox.min_lat;
        assert!((lat_span - 0.18).abs() < 0.02, "Lat span should be ~0.18 degrees");
    }

    #[test]
    fn test_bounding_box_contains_radius() {
        // A point just inside the radius due east must fall inside the box
        let center = GeoPoint::new(60.0, 10.0);
        let bbox = calculate_bounding_box(center.lat, center.lng, 5.0);
        let east = GeoPoint::new(60.0, 10.0 + 4.9 / (111.2 * 60f64.to_radians().cos()));

        assert!(distance_km(&center, &east) < 5.0);
        assert!(is_within_bounding_box(east.lat, east.lng, &bbox));
    }

    #[test]
    fn test_bounding_box_at_pole_spans_all_longitudes() {
        let bbox = calculate_bounding_box(89.99, 45.0, 5.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert_eq!(bbox.max_lat, 90.0);
    }

    #[test]
    fn test_bounding_box_across_antimeridian() {
        let bbox = calculate_bounding_box(-16.5, 179.99, 5.0);
        assert!(is_within_bounding_box(-16.5, -179.99, &bbox));
    }

    #[test]
    fn test_point_within_bbox() {
        let bbox = calculate_bounding_box(40.7128, -74.0060, 10.0);

        assert!(is_within_bounding_box(40.7128, -74.0060, &bbox));
        assert!(is_within_bounding_box(40.71, -74.0, &bbox));
        assert!(!is_within_bounding_box(50.0, -80.0, &bbox));
    }
}
