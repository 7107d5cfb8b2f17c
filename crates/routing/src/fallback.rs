use tracing::warn;

use crate::protocol::{
    AnalysisJob, AnalysisRequest, DensityReading, DensityRequest, DirectionsRequest,
    ElevationResponse, GeocodeResult, IsochroneCollection, IsochroneRequest, RouteCollection,
};
use crate::service::{BoxFuture, RoutingService, ServiceError};

/// Tries `primary` first and answers from `fallback` when it fails.
///
/// The primary error is logged and dropped; callers only see an error if the
/// fallback fails as well.
#[derive(Debug, Clone)]
pub struct FallbackService<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackService<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: RoutingService, F: RoutingService> RoutingService for FallbackService<P, F> {
    fn geocode(&self, query: String) -> BoxFuture<'_, Result<Vec<GeocodeResult>, ServiceError>> {
        Box::pin(async move {
            match self.primary.geocode(query.clone()).await {
                Ok(results) => Ok(results),
                Err(err) => {
                    warn!(error = %err, "geocode failed, using fallback data");
                    self.fallback.geocode(query).await
                }
            }
        })
    }

    fn directions(
        &self,
        request: DirectionsRequest,
    ) -> BoxFuture<'_, Result<RouteCollection, ServiceError>> {
        Box::pin(async move {
            match self.primary.directions(request.clone()).await {
                Ok(routes) => Ok(routes),
                Err(err) => {
                    warn!(error = %err, "directions failed, using fallback route");
                    self.fallback.directions(request).await
                }
            }
        })
    }

    fn traffic_density(
        &self,
        request: DensityRequest,
    ) -> BoxFuture<'_, Result<Vec<DensityReading>, ServiceError>> {
        Box::pin(async move {
            match self.primary.traffic_density(request.clone()).await {
                Ok(readings) => Ok(readings),
                Err(err) => {
                    warn!(error = %err, "traffic density failed, using fallback readings");
                    self.fallback.traffic_density(request).await
                }
            }
        })
    }

    fn route_analysis(
        &self,
        request: AnalysisRequest,
    ) -> BoxFuture<'_, Result<AnalysisJob, ServiceError>> {
        Box::pin(async move {
            match self.primary.route_analysis(request.clone()).await {
                Ok(job) => Ok(job),
                Err(err) => {
                    warn!(error = %err, "route analysis failed, using fallback job");
                    self.fallback.route_analysis(request).await
                }
            }
        })
    }

    fn isochrones(
        &self,
        request: IsochroneRequest,
    ) -> BoxFuture<'_, Result<IsochroneCollection, ServiceError>> {
        Box::pin(async move {
            match self.primary.isochrones(request.clone()).await {
                Ok(areas) => Ok(areas),
                Err(err) => {
                    warn!(error = %err, "isochrones failed, using fallback areas");
                    self.fallback.isochrones(request).await
                }
            }
        })
    }

    fn elevation(
        &self,
        lat: f64,
        lon: f64,
    ) -> BoxFuture<'_, Result<ElevationResponse, ServiceError>> {
        Box::pin(async move {
            match self.primary.elevation(lat, lon).await {
                Ok(lookup) => Ok(lookup),
                Err(err) => {
                    warn!(error = %err, lat, lon, "elevation failed, using fallback value");
                    self.fallback.elevation(lat, lon).await
                }
            }
        })
    }
}
