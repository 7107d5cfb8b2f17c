use foundation::LatLon;
use foundation::math::path_length_m;
use routing::{AreaGeometry, FeatureGeometry, IsochroneCollection, RouteCollection, RouteFeature};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub distance_m: f64,
    pub duration_s: f64,
    pub instruction: String,
}

/// One fetched travel path. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    lon_lat: Vec<[f64; 2]>,
    path: Vec<LatLon>,
    duration_s: f64,
    distance_m: f64,
    steps: Vec<RouteStep>,
}

impl RouteGeometry {
    pub fn new(path: Vec<LatLon>, duration_s: f64, distance_m: f64) -> Self {
        Self {
            lon_lat: path.iter().map(|p| p.to_lon_lat()).collect(),
            path,
            duration_s,
            distance_m,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<RouteStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Builds a route from one directions feature.
    ///
    /// Returns `None` for anything that is not a line of at least two points.
    /// Positions with fewer than two values are skipped.
    pub fn from_feature(feature: &RouteFeature) -> Option<Self> {
        let Some(FeatureGeometry::LineString { coordinates }) = &feature.geometry else {
            return None;
        };
        let lon_lat: Vec<[f64; 2]> = coordinates
            .iter()
            .filter_map(|c| match c.as_slice() {
                [lon, lat, ..] => Some([*lon, *lat]),
                _ => None,
            })
            .collect();
        if lon_lat.len() < 2 {
            return None;
        }

        let props = &feature.properties;
        let duration_s = props
            .summary
            .duration
            .unwrap_or_else(|| props.segments.iter().map(|s| s.duration).sum());
        let distance_m = props
            .summary
            .distance
            .unwrap_or_else(|| props.segments.iter().map(|s| s.distance).sum());
        let steps = props
            .segments
            .iter()
            .flat_map(|s| &s.steps)
            .map(|s| RouteStep {
                distance_m: s.distance,
                duration_s: s.duration,
                instruction: s.instruction.clone(),
            })
            .collect();

        Some(Self {
            path: lon_lat.iter().map(|p| LatLon::from_lon_lat(*p)).collect(),
            lon_lat,
            duration_s,
            distance_m,
            steps,
        })
    }

    /// Positions as received, `[lon, lat]`.
    pub fn lon_lat(&self) -> &[[f64; 2]] {
        &self.lon_lat
    }

    pub fn path(&self) -> &[LatLon] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn start(&self) -> Option<LatLon> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<LatLon> {
        self.path.last().copied()
    }

    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    /// Great-circle length of the polyline itself.
    pub fn measured_length_m(&self) -> f64 {
        path_length_m(&self.path)
    }
}

/// Every usable route in a directions response, in response order.
pub fn routes_from_collection(collection: &RouteCollection) -> Vec<RouteGeometry> {
    collection
        .features
        .iter()
        .filter_map(RouteGeometry::from_feature)
        .collect()
}

/// Area reachable within `range_s` seconds of travel, as a closed ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachableArea {
    pub range_s: f64,
    pub ring: Vec<LatLon>,
}

/// Outer rings of every polygon feature, nearest range first. Rings with
/// fewer than four positions cannot be closed areas and are dropped.
pub fn reachable_areas_from(collection: &IsochroneCollection) -> Vec<ReachableArea> {
    let mut areas: Vec<ReachableArea> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let Some(AreaGeometry::Polygon { coordinates }) = &feature.geometry else {
                return None;
            };
            let ring: Vec<LatLon> = coordinates
                .first()?
                .iter()
                .filter_map(|c| match c.as_slice() {
                    [lon, lat, ..] => Some(LatLon::new(*lat, *lon)),
                    _ => None,
                })
                .collect();
            (ring.len() >= 4).then(|| ReachableArea {
                range_s: feature.properties.value,
                ring,
            })
        })
        .collect();
    areas.sort_by(|a, b| a.range_s.total_cmp(&b.range_s));
    areas
}
