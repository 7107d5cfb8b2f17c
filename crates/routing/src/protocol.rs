//! Wire format for the routing/traffic REST service.
//!
//! Axis order differs per call and is part of the contract:
//! - directions and route analysis take `[lon, lat]` pairs (GeoJSON order)
//! - traffic density takes and returns `lat`/`lon` (latitude first)

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `[lon, lat]` pair as used by GeoJSON.
pub type LonLatPair = [f64; 2];

/// `[lat, lon]` pair as used by the traffic density endpoint.
pub type LatLonPair = [f64; 2];

/// Travel profile understood by the directions service.
///
/// Unknown profiles are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TravelProfile {
    #[default]
    FootWalking,
    DrivingCar,
    Other(String),
}

impl TravelProfile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::FootWalking => "foot-walking",
            Self::DrivingCar => "driving-car",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<&str> for TravelProfile {
    fn from(raw: &str) -> Self {
        match raw {
            "foot-walking" => Self::FootWalking,
            "driving-car" => Self::DrivingCar,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::str::FromStr for TravelProfile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TravelProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TravelProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// GeoJSON MultiPolygon: polygons of rings of `[lon, lat]` positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct MultiPolygon {
    pub coordinates: Vec<Vec<Vec<LonLatPair>>>,
}

impl MultiPolygon {
    pub fn polygon_count(&self) -> usize {
        self.coordinates.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub coordinates: Vec<LonLatPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_polygons: Option<MultiPolygon>,
    pub profile: TravelProfile,
}

/// GeoJSON feature collection returned by the directions call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteCollection {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<RouteFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFeature {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub properties: RouteProperties,
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureGeometry {
    /// Positions may carry a third (elevation) value; only the first two are used.
    LineString { coordinates: Vec<Vec<f64>> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteProperties {
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
    #[serde(default)]
    pub summary: RouteSummary,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub steps: Vec<RouteStepWire>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStepWire {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityRequest {
    pub points: Vec<LatLonPair>,
}

/// One traffic reading, index-aligned with the request points.
///
/// Any field may be missing; a missing `current_speed` means "no data".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReading {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub current_speed: Option<f64>,
    #[serde(default)]
    pub free_flow_speed: Option<f64>,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Accepts `0.42`, `"0.42"` or `null`. Unparseable strings become `None`.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub coordinates: Vec<LonLatPair>,
}

/// Handle for an asynchronous route analysis job. Polling is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisJob {
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub result_urls: BTreeMap<String, String>,
}

/// Reachability windows requested when the caller gives none, in seconds.
pub const DEFAULT_ISOCHRONE_RANGES_S: [f64; 3] = [300.0, 600.0, 900.0];

/// Areas reachable from `location` within each travel time in `ranges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneRequest {
    pub location: LonLatPair,
    pub ranges: Vec<f64>,
    pub profile: TravelProfile,
}

impl IsochroneRequest {
    pub fn new(location: LonLatPair, profile: TravelProfile) -> Self {
        Self {
            location,
            ranges: DEFAULT_ISOCHRONE_RANGES_S.to_vec(),
            profile,
        }
    }
}

/// GeoJSON feature collection with one polygon per requested range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsochroneCollection {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<IsochroneFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneFeature {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub properties: IsochroneProperties,
    #[serde(default)]
    pub geometry: Option<AreaGeometry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IsochroneProperties {
    /// Travel time in seconds this area was computed for.
    #[serde(default)]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LonLatPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AreaGeometry {
    /// Rings of `[lon, lat]` positions; the first ring is the outer boundary.
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// Elevation lookup as relayed from the terrain dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElevationResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<ElevationResult>,
}

impl ElevationResponse {
    /// Elevation of the first result, if the dataset covers the point.
    pub fn elevation_m(&self) -> Option<f64> {
        self.results.first().and_then(|r| r.elevation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationResult {
    #[serde(default)]
    pub dataset: Option<String>,
    /// `null` outside dataset coverage.
    #[serde(default)]
    pub elevation: Option<f64>,
    pub location: ElevationLocation,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationLocation {
    pub lat: f64,
    pub lng: f64,
}
