use foundation::LatLon;

/// Picks every `interval`-th point of a `[lon, lat]` route and returns it in
/// latitude-first order.
///
/// The first and last route points are always present (compared by value, so
/// a route that ends where it starts does not get a duplicate). An interval of
/// zero behaves like one. An empty route yields an empty sample.
pub fn sample(route: &[[f64; 2]], interval: usize) -> Vec<LatLon> {
    let (Some(first), Some(last)) = (route.first(), route.last()) else {
        return Vec::new();
    };
    let first = LatLon::from_lon_lat(*first);
    let last = LatLon::from_lon_lat(*last);

    let mut sampled: Vec<LatLon> = route
        .iter()
        .step_by(interval.max(1))
        .map(|p| LatLon::from_lon_lat(*p))
        .collect();

    if sampled.first() != Some(&first) {
        sampled.insert(0, first);
    }
    if sampled.last() != Some(&last) {
        sampled.push(last);
    }
    sampled
}
