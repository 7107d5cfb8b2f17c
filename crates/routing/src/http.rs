use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::protocol::{
    AnalysisJob, AnalysisRequest, DensityReading, DensityRequest, DirectionsRequest,
    ElevationResponse, GeocodeResult, IsochroneCollection, IsochroneRequest, RouteCollection,
};
use crate::service::{BoxFuture, RoutingService, ServiceError};

/// Default API root of the planner backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// REST implementation of [`RoutingService`].
///
/// Endpoints are resolved relative to `base_url`:
/// `GET geocode?query=`, `POST directions`, `POST traffic/density`,
/// `POST traffic/route-analysis`, `POST isochrones`, `GET elevation?lat=&lon=`.
#[derive(Debug, Clone)]
pub struct HttpRoutingService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpRoutingService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::with_source(format!("POST {path} failed"), e))?;
        decode(path, resp).await
    }
}

async fn decode<T: DeserializeOwned>(
    path: &str,
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ServiceError::with_status(
            format!("{path} returned an error"),
            status.as_u16(),
        ));
    }
    resp.json::<T>().await.map_err(|e| {
        ServiceError::with_source(format!("{path} response could not be decoded"), e)
    })
}

impl Default for HttpRoutingService {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl RoutingService for HttpRoutingService {
    fn geocode(&self, query: String) -> BoxFuture<'_, Result<Vec<GeocodeResult>, ServiceError>> {
        Box::pin(async move {
            let url = self.url("geocode");
            debug!(%url, %query, "GET");
            let resp = self
                .client
                .get(&url)
                .query(&[("query", query.as_str())])
                .send()
                .await
                .map_err(|e| ServiceError::with_source("GET geocode failed", e))?;
            decode("geocode", resp).await
        })
    }

    fn directions(
        &self,
        request: DirectionsRequest,
    ) -> BoxFuture<'_, Result<RouteCollection, ServiceError>> {
        Box::pin(async move { self.post_json("directions", &request).await })
    }

    fn traffic_density(
        &self,
        request: DensityRequest,
    ) -> BoxFuture<'_, Result<Vec<DensityReading>, ServiceError>> {
        Box::pin(async move { self.post_json("traffic/density", &request).await })
    }

    fn route_analysis(
        &self,
        request: AnalysisRequest,
    ) -> BoxFuture<'_, Result<AnalysisJob, ServiceError>> {
        Box::pin(async move { self.post_json("traffic/route-analysis", &request).await })
    }

    fn isochrones(
        &self,
        request: IsochroneRequest,
    ) -> BoxFuture<'_, Result<IsochroneCollection, ServiceError>> {
        Box::pin(async move { self.post_json("isochrones", &request).await })
    }

    fn elevation(
        &self,
        lat: f64,
        lon: f64,
    ) -> BoxFuture<'_, Result<ElevationResponse, ServiceError>> {
        Box::pin(async move {
            let url = self.url("elevation");
            debug!(%url, lat, lon, "GET");
            let resp = self
                .client
                .get(&url)
                .query(&[("lat", lat), ("lon", lon)])
                .send()
                .await
                .map_err(|e| ServiceError::with_source("GET elevation failed", e))?;
            decode("elevation", resp).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HttpRoutingService;

    #[test]
    fn joins_paths_without_double_slash() {
        let svc = HttpRoutingService::new("http://localhost:8000/api/");
        assert_eq!(svc.url("traffic/density"), "http://localhost:8000/api/traffic/density");
        let svc = HttpRoutingService::default();
        assert_eq!(svc.url("directions"), "http://localhost:8000/api/directions");
        assert_eq!(svc.url("isochrones"), "http://localhost:8000/api/isochrones");
    }
}
