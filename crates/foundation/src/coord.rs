use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees, latitude first.
///
/// No normalization is applied: out-of-range values are carried through as-is.
/// Routing collaborators speak `[lon, lat]`; convert at the boundary with
/// [`LatLon::to_lon_lat`] / [`LatLon::from_lon_lat`].
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn from_lon_lat(p: [f64; 2]) -> Self {
        Self { lat: p[1], lon: p[0] }
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn to_lat_lon(self) -> [f64; 2] {
        [self.lat, self.lon]
    }

    /// Linear interpolation in degree space; `t` is not clamped.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lon)
    }
}
