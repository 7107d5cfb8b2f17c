use crate::coord::LatLon;

/// Mean Earth radius (meters), IUGG.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates (meters).
pub fn haversine_m(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Sum of segment lengths along a polyline (meters). Fewer than two points is zero.
pub fn path_length_m(points: &[LatLon]) -> f64 {
    points.windows(2).map(|w| haversine_m(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::{haversine_m, path_length_m};
    use crate::coord::LatLon;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_m(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0));
        assert_close(d, 111_195.0, 1.0);
    }

    #[test]
    fn identical_points_are_zero() {
        let p = LatLon::new(40.7128, -74.006);
        assert_eq!(haversine_m(p, p), 0.0);
    }

    #[test]
    fn path_length_sums_segments() {
        let pts = [
            LatLon::new(0.0, 0.0),
            LatLon::new(1.0, 0.0),
            LatLon::new(2.0, 0.0),
        ];
        assert_close(path_length_m(&pts), 2.0 * 111_195.0, 2.0);
        assert_eq!(path_length_m(&pts[..1]), 0.0);
        assert_eq!(path_length_m(&[]), 0.0);
    }
}
