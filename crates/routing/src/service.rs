use std::future::Future;
use std::pin::Pin;

use crate::protocol::{
    AnalysisJob, AnalysisRequest, DensityReading, DensityRequest, DirectionsRequest,
    ElevationResponse, GeocodeResult, IsochroneCollection, IsochroneRequest, RouteCollection,
};

/// Error returned by a routing collaborator call.
#[derive(Debug)]
pub struct ServiceError {
    pub message: String,
    /// HTTP status when the service answered with a non-success code.
    pub status: Option<u16>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The external routing/traffic collaborator.
///
/// Each call is a single request/response; no retry policy is applied here.
/// Methods return boxed futures so the trait stays dyn-compatible.
pub trait RoutingService: Send + Sync {
    fn geocode(&self, query: String) -> BoxFuture<'_, Result<Vec<GeocodeResult>, ServiceError>>;

    /// Returns one or more routes as a GeoJSON feature collection.
    fn directions(
        &self,
        request: DirectionsRequest,
    ) -> BoxFuture<'_, Result<RouteCollection, ServiceError>>;

    /// Readings are index-aligned with `request.points`.
    fn traffic_density(
        &self,
        request: DensityRequest,
    ) -> BoxFuture<'_, Result<Vec<DensityReading>, ServiceError>>;

    fn route_analysis(
        &self,
        request: AnalysisRequest,
    ) -> BoxFuture<'_, Result<AnalysisJob, ServiceError>>;

    /// One area per requested travel time, as GeoJSON polygons.
    fn isochrones(
        &self,
        request: IsochroneRequest,
    ) -> BoxFuture<'_, Result<IsochroneCollection, ServiceError>>;

    fn elevation(
        &self,
        lat: f64,
        lon: f64,
    ) -> BoxFuture<'_, Result<ElevationResponse, ServiceError>>;
}
