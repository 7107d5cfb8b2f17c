use routing::TravelProfile;
use serde::{Deserialize, Serialize};

/// Tunables for a planning session.
///
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Stride used when sampling a route for traffic queries.
    pub sample_interval: usize,
    /// Agent speed (segment units per tick) when the route reports no duration/distance.
    pub default_speed: f64,
    /// Animation frames per reported route second.
    pub frames_per_route_second: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Radius of the zone drawn around each blockage in defense mode.
    pub defense_radius_m: f64,
    /// Seed for agent jitter and crowd-size rolls.
    pub seed: u64,
    pub profile: TravelProfile,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            sample_interval: 7,
            default_speed: 0.2,
            frames_per_route_second: 0.05,
            min_speed: 0.05,
            max_speed: 0.8,
            defense_radius_m: 300.0,
            seed: 42,
            profile: TravelProfile::FootWalking,
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
