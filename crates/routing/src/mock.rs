use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::protocol::{
    AnalysisJob, AnalysisRequest, AreaGeometry, DensityReading, DensityRequest,
    DirectionsRequest, ElevationLocation, ElevationResponse, ElevationResult, FeatureGeometry,
    GeocodeResult, IsochroneCollection, IsochroneFeature, IsochroneProperties, IsochroneRequest,
    RouteCollection, RouteFeature, RouteProperties, RouteSegment, RouteStepWire, RouteSummary,
    TravelProfile,
};
use crate::service::{BoxFuture, RoutingService, ServiceError};

/// Seed used when no explicit seed is provided.
pub const DEFAULT_MOCK_SEED: u64 = 42;

const MOCK_PLACES: [(&str, f64, f64); 3] = [
    ("New York City, NY, USA", 40.7128, -74.006),
    ("Brooklyn, NY, USA", 40.6782, -73.9442),
    ("Manhattan, NY, USA", 40.7831, -73.9712),
];

const MOCK_DISTANCE_M: f64 = 2500.0;
const MOCK_DURATION_S: f64 = 1800.0;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Vertices per mock isochrone ring, before closing.
const ISOCHRONE_VERTICES: usize = 16;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

fn travel_speed_mps(profile: &TravelProfile) -> f64 {
    match profile {
        TravelProfile::DrivingCar => 8.3,
        TravelProfile::FootWalking | TravelProfile::Other(_) => 1.4,
    }
}

/// Offline stand-in for the routing backend.
///
/// Every payload is a pure function of the request and the seed: the RNG is
/// re-seeded on each call, so identical requests yield identical responses.
#[derive(Debug, Clone, Copy)]
pub struct MockRoutingService {
    seed: u64,
}

impl MockRoutingService {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    pub fn geocode_now(&self, query: &str) -> Vec<GeocodeResult> {
        let needle = query.to_lowercase();
        MOCK_PLACES
            .iter()
            .filter(|(name, _, _)| name.to_lowercase().contains(&needle))
            .map(|&(name, lat, lon)| GeocodeResult {
                display_name: name.to_string(),
                lat,
                lon,
                kind: None,
            })
            .collect()
    }

    /// A four-point line from start to end through two fixed offsets of the start.
    pub fn directions_now(
        &self,
        request: &DirectionsRequest,
    ) -> Result<RouteCollection, ServiceError> {
        let (start, end) = match request.coordinates.as_slice() {
            [start, end, ..] => (*start, *end),
            _ => {
                return Err(ServiceError::new(
                    "directions need a start and an end coordinate",
                ));
            }
        };

        let coordinates = vec![
            vec![start[0], start[1]],
            vec![start[0] + 0.01, start[1] + 0.01],
            vec![start[0] + 0.02, start[1] + 0.005],
            vec![end[0], end[1]],
        ];

        let steps = vec![
            RouteStepWire {
                distance: 800.0,
                duration: 600.0,
                instruction: "Walk straight on Broadway".to_string(),
            },
            RouteStepWire {
                distance: 900.0,
                duration: 650.0,
                instruction: "Turn right onto 5th Avenue".to_string(),
            },
            RouteStepWire {
                distance: 800.0,
                duration: 550.0,
                instruction: "Continue onto Park Avenue".to_string(),
            },
        ];

        Ok(RouteCollection {
            kind: "FeatureCollection".to_string(),
            features: vec![RouteFeature {
                kind: "Feature".to_string(),
                properties: RouteProperties {
                    segments: vec![RouteSegment {
                        distance: MOCK_DISTANCE_M,
                        duration: MOCK_DURATION_S,
                        steps,
                    }],
                    summary: RouteSummary {
                        distance: Some(MOCK_DISTANCE_M),
                        duration: Some(MOCK_DURATION_S),
                    },
                },
                geometry: Some(FeatureGeometry::LineString { coordinates }),
            }],
        })
    }

    pub fn density_now(&self, request: &DensityRequest) -> Vec<DensityReading> {
        let mut rng = self.rng();
        request
            .points
            .iter()
            .map(|&[lat, lon]| {
                let current_speed = rng.gen_range(0.0..30.0);
                let free_flow_speed = rng.gen_range(20.0..70.0);
                // Two decimals, like the backend's confidence values.
                let confidence = (rng.gen_range(0.0..1.0_f64) * 100.0).floor() / 100.0;
                DensityReading {
                    lat: Some(lat),
                    lon: Some(lon),
                    current_speed: Some(current_speed),
                    free_flow_speed: Some(free_flow_speed),
                    confidence: Some(confidence),
                    error: None,
                }
            })
            .collect()
    }

    pub fn analysis_now(&self, _request: &AnalysisRequest) -> AnalysisJob {
        let mut rng = self.rng();
        let suffix: String = (0..8)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        let mut result_urls = BTreeMap::new();
        result_urls.insert(
            "trafficDensity".to_string(),
            "https://example.com/traffic-density".to_string(),
        );
        result_urls.insert(
            "routeAnalysis".to_string(),
            "https://example.com/route-analysis".to_string(),
        );

        AnalysisJob {
            job_id: format!("mock-job-{suffix}"),
            status: "completed".to_string(),
            result_urls,
        }
    }

    /// Concentric circles around the location, sized by profile speed times range.
    pub fn isochrones_now(&self, request: &IsochroneRequest) -> IsochroneCollection {
        let [lon, lat] = request.location;
        let speed = travel_speed_mps(&request.profile);
        let features = request
            .ranges
            .iter()
            .map(|&range_s| {
                let radius_m = speed * range_s;
                let dlat = radius_m / METERS_PER_DEGREE_LAT;
                let dlon = radius_m / (METERS_PER_DEGREE_LAT * lat.to_radians().cos().max(1e-6));
                let mut ring: Vec<Vec<f64>> = (0..ISOCHRONE_VERTICES)
                    .map(|i| {
                        let a = std::f64::consts::TAU * i as f64 / ISOCHRONE_VERTICES as f64;
                        vec![lon + dlon * a.cos(), lat + dlat * a.sin()]
                    })
                    .collect();
                ring.push(ring[0].clone());
                IsochroneFeature {
                    kind: "Feature".to_string(),
                    properties: IsochroneProperties {
                        value: range_s,
                        center: Some(request.location),
                    },
                    geometry: Some(AreaGeometry::Polygon {
                        coordinates: vec![ring],
                    }),
                }
            })
            .collect();
        IsochroneCollection {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Stable pseudo-elevation in `[0, 120)` m, a function of the seed and the point.
    pub fn elevation_now(&self, lat: f64, lon: f64) -> ElevationResponse {
        let point_seed = lat.to_bits().rotate_left(17) ^ lon.to_bits();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ point_seed);
        let elevation = (rng.gen_range(0.0..120.0_f64) * 10.0).floor() / 10.0;
        ElevationResponse {
            status: "OK".to_string(),
            results: vec![ElevationResult {
                dataset: Some("mock".to_string()),
                elevation: Some(elevation),
                location: ElevationLocation { lat, lng: lon },
            }],
        }
    }
}

impl Default for MockRoutingService {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_SEED)
    }
}

impl RoutingService for MockRoutingService {
    fn geocode(&self, query: String) -> BoxFuture<'_, Result<Vec<GeocodeResult>, ServiceError>> {
        Box::pin(async move { Ok(self.geocode_now(&query)) })
    }

    fn directions(
        &self,
        request: DirectionsRequest,
    ) -> BoxFuture<'_, Result<RouteCollection, ServiceError>> {
        Box::pin(async move { self.directions_now(&request) })
    }

    fn traffic_density(
        &self,
        request: DensityRequest,
    ) -> BoxFuture<'_, Result<Vec<DensityReading>, ServiceError>> {
        Box::pin(async move { Ok(self.density_now(&request)) })
    }

    fn route_analysis(
        &self,
        request: AnalysisRequest,
    ) -> BoxFuture<'_, Result<AnalysisJob, ServiceError>> {
        Box::pin(async move { Ok(self.analysis_now(&request)) })
    }

    fn isochrones(
        &self,
        request: IsochroneRequest,
    ) -> BoxFuture<'_, Result<IsochroneCollection, ServiceError>> {
        Box::pin(async move { Ok(self.isochrones_now(&request)) })
    }

    fn elevation(
        &self,
        lat: f64,
        lon: f64,
    ) -> BoxFuture<'_, Result<ElevationResponse, ServiceError>> {
        Box::pin(async move { Ok(self.elevation_now(lat, lon)) })
    }
}

#[cfg(test)]
mod tests {
    use super::MockRoutingService;
    use crate::protocol::{
        AnalysisRequest, AreaGeometry, DensityRequest, DirectionsRequest, FeatureGeometry,
        IsochroneRequest, TravelProfile,
    };
    use crate::service::RoutingService;
    use pretty_assertions::assert_eq;

    #[test]
    fn geocode_filters_case_insensitively() {
        let mock = MockRoutingService::default();
        let hits = mock.geocode_now("BROOK");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].display_name, "Brooklyn, NY, USA");
        assert_eq!(mock.geocode_now("ny").len(), 3);
        assert!(mock.geocode_now("paris").is_empty());
    }

    #[test]
    fn directions_pass_through_start_and_end() {
        let mock = MockRoutingService::default();
        let req = DirectionsRequest {
            coordinates: vec![[-74.0, 40.7], [-73.95, 40.75]],
            avoid_polygons: None,
            profile: TravelProfile::FootWalking,
        };
        let routes = mock.directions_now(&req).expect("route");
        let Some(FeatureGeometry::LineString { coordinates }) = &routes.features[0].geometry
        else {
            panic!("expected a line");
        };
        assert_eq!(coordinates.len(), 4);
        assert_eq!(coordinates[0], vec![-74.0, 40.7]);
        assert_eq!(coordinates[3], vec![-73.95, 40.75]);
        assert_eq!(routes.features[0].properties.summary.duration, Some(1800.0));
        assert_eq!(routes.features[0].properties.segments[0].steps.len(), 3);
    }

    #[test]
    fn directions_without_end_is_an_error() {
        let mock = MockRoutingService::default();
        let req = DirectionsRequest {
            coordinates: vec![[-74.0, 40.7]],
            avoid_polygons: None,
            profile: TravelProfile::FootWalking,
        };
        assert!(mock.directions_now(&req).is_err());
    }

    #[test]
    fn density_is_deterministic_and_in_range() {
        let mock = MockRoutingService::new(7);
        let req = DensityRequest {
            points: vec![[40.7, -74.0], [40.71, -74.01], [40.72, -74.02]],
        };
        let a = mock.density_now(&req);
        let b = mock.density_now(&req);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        for (reading, point) in a.iter().zip(&req.points) {
            assert_eq!(reading.lat, Some(point[0]));
            assert_eq!(reading.lon, Some(point[1]));
            let speed = reading.current_speed.expect("speed");
            assert!((0.0..30.0).contains(&speed));
            let free = reading.free_flow_speed.expect("free flow");
            assert!((20.0..70.0).contains(&free));
            let confidence = reading.confidence.expect("confidence");
            assert!((0.0..1.0).contains(&confidence));
        }
    }

    #[tokio::test]
    async fn analysis_job_is_completed_mock() {
        let mock = MockRoutingService::default();
        let job = mock
            .route_analysis(AnalysisRequest {
                coordinates: vec![[-74.0, 40.7], [-73.9, 40.8]],
            })
            .await
            .expect("job");
        assert!(job.job_id.starts_with("mock-job-"));
        assert_eq!(job.job_id.len(), "mock-job-".len() + 8);
        assert_eq!(job.status, "completed");
        assert_eq!(job.result_urls.len(), 2);
    }

    #[test]
    fn isochrones_grow_with_range_and_speed() {
        let mock = MockRoutingService::default();
        let walk = mock.isochrones_now(&IsochroneRequest::new(
            [-74.0, 40.7],
            TravelProfile::FootWalking,
        ));
        assert_eq!(walk.features.len(), 3);

        let east_extent = |feature: &crate::protocol::IsochroneFeature| {
            let Some(AreaGeometry::Polygon { coordinates }) = &feature.geometry else {
                panic!("expected a polygon");
            };
            let ring = &coordinates[0];
            assert_eq!(ring.len(), 17);
            assert_eq!(ring.first(), ring.last());
            ring.iter().map(|p| p[0]).fold(f64::MIN, f64::max) + 74.0
        };
        let extents: Vec<f64> = walk.features.iter().map(east_extent).collect();
        assert!(extents[0] < extents[1] && extents[1] < extents[2]);
        assert_eq!(walk.features[1].properties.value, 600.0);
        assert_eq!(walk.features[1].properties.center, Some([-74.0, 40.7]));

        let drive = mock.isochrones_now(&IsochroneRequest::new(
            [-74.0, 40.7],
            TravelProfile::DrivingCar,
        ));
        assert!(east_extent(&drive.features[0]) > extents[0]);
    }

    #[tokio::test]
    async fn elevation_is_stable_per_point() {
        let mock = MockRoutingService::new(3);
        let a = mock.elevation(40.7, -74.0).await.expect("elevation");
        let b = mock.elevation(40.7, -74.0).await.expect("elevation");
        assert_eq!(a, b);
        assert_eq!(a.status, "OK");
        let meters = a.elevation_m().expect("covered");
        assert!((0.0..120.0).contains(&meters));
        assert_eq!(a.results[0].location.lng, -74.0);
    }
}
