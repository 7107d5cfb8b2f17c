use std::ops::Range;

use foundation::LatLon;
use rand::Rng;
use routing::DensityReading;
use serde::{Deserialize, Serialize};

/// Below this speed (km/h) a reading is heavy congestion.
pub const HEAVY_BELOW_KMH: f64 = 10.0;
/// Below this speed (km/h) a reading is moderate congestion.
pub const MODERATE_BELOW_KMH: f64 = 20.0;
/// Crowd size assumed when there is no usable reading.
pub const NO_DATA_AGENT_COUNT: usize = 5;

/// Point-wise traffic reading. `None` speeds mean "no data", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensitySample {
    pub location: LatLon,
    pub current_speed: Option<f64>,
    pub free_flow_speed: Option<f64>,
    pub confidence: Option<f64>,
}

impl DensitySample {
    pub fn no_data(location: LatLon) -> Self {
        Self {
            location,
            current_speed: None,
            free_flow_speed: None,
            confidence: None,
        }
    }

    /// Builds a sample from a wire reading. `requested` is used when the
    /// reading does not echo its own location.
    pub fn from_reading(reading: &DensityReading, requested: LatLon) -> Self {
        let location = match (reading.lat, reading.lon) {
            (Some(lat), Some(lon)) => LatLon::new(lat, lon),
            _ => requested,
        };
        Self {
            location,
            current_speed: reading.current_speed.filter(|s| !s.is_nan()),
            free_flow_speed: reading.free_flow_speed,
            confidence: reading.confidence,
        }
    }
}

/// Discrete congestion classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NoData,
    Heavy,
    Moderate,
    Light,
}

impl Tier {
    /// Heatmap fill colour.
    pub fn color(self) -> &'static str {
        match self {
            Tier::NoData => "#555555",
            Tier::Heavy => "#ff0000",
            Tier::Moderate => "#ff9900",
            Tier::Light => "#00ff00",
        }
    }
}

pub fn classify(sample: &DensitySample) -> Tier {
    match sample.current_speed {
        None => Tier::NoData,
        Some(s) if s.is_nan() => Tier::NoData,
        Some(s) if s < HEAVY_BELOW_KMH => Tier::Heavy,
        Some(s) if s < MODERATE_BELOW_KMH => Tier::Moderate,
        Some(_) => Tier::Light,
    }
}

/// Half-open range of agent counts for a tier.
pub fn agent_count_hint(tier: Tier) -> Range<usize> {
    match tier {
        Tier::Heavy => 15..20,
        Tier::Moderate => 8..13,
        Tier::Light => 3..6,
        Tier::NoData => NO_DATA_AGENT_COUNT..NO_DATA_AGENT_COUNT + 1,
    }
}

/// Rolls a concrete crowd size for `sample`, or the no-data constant when absent.
pub fn agent_count_for<R: Rng + ?Sized>(sample: Option<&DensitySample>, rng: &mut R) -> usize {
    let Some(sample) = sample else {
        return NO_DATA_AGENT_COUNT;
    };
    rng.gen_range(agent_count_hint(classify(sample)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn at(speed: Option<f64>) -> DensitySample {
        DensitySample {
            current_speed: speed,
            ..DensitySample::no_data(LatLon::new(40.0, -74.0))
        }
    }

    #[test]
    fn tier_boundaries_are_strict() {
        assert_eq!(classify(&at(None)), Tier::NoData);
        assert_eq!(classify(&at(Some(0.0))), Tier::Heavy);
        assert_eq!(classify(&at(Some(9.99))), Tier::Heavy);
        assert_eq!(classify(&at(Some(10.0))), Tier::Moderate);
        assert_eq!(classify(&at(Some(19.999))), Tier::Moderate);
        assert_eq!(classify(&at(Some(20.0))), Tier::Light);
        assert_eq!(classify(&at(Some(85.0))), Tier::Light);
        assert_eq!(classify(&at(Some(f64::NAN))), Tier::NoData);
    }

    #[test]
    fn missing_speed_ignores_other_fields() {
        let s = DensitySample {
            free_flow_speed: Some(50.0),
            confidence: Some(1.0),
            ..at(None)
        };
        assert_eq!(classify(&s), Tier::NoData);
    }

    #[test]
    fn count_ranges() {
        assert_eq!(agent_count_hint(Tier::Heavy), 15..20);
        assert_eq!(agent_count_hint(Tier::Moderate), 8..13);
        assert_eq!(agent_count_hint(Tier::Light), 3..6);
        assert_eq!(agent_count_hint(Tier::NoData), 5..6);
    }

    #[test]
    fn rolled_counts_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let heavy = agent_count_for(Some(&at(Some(4.0))), &mut rng);
            assert!((15..20).contains(&heavy));
            let light = agent_count_for(Some(&at(Some(45.0))), &mut rng);
            assert!((3..6).contains(&light));
        }
        assert_eq!(agent_count_for(None, &mut rng), 5);
        assert_eq!(agent_count_for(Some(&at(None)), &mut rng), 5);
    }

    #[test]
    fn reading_without_location_uses_requested_point() {
        let reading = DensityReading {
            current_speed: Some(12.0),
            ..DensityReading::default()
        };
        let requested = LatLon::new(1.0, 2.0);
        let s = DensitySample::from_reading(&reading, requested);
        assert_eq!(s.location, requested);
        assert_eq!(classify(&s), Tier::Moderate);
    }

    #[test]
    fn colors_follow_tiers() {
        assert_eq!(Tier::Heavy.color(), "#ff0000");
        assert_eq!(Tier::NoData.color(), "#555555");
    }
}
