//! Planning session.
//!
//! `Planner` owns every piece of session state and is the only thing that
//! mutates it. Collaborator calls are split into `prepare_*` (build the
//! request and issue a sequence ticket) and `apply_*` (fold the response back
//! in if its ticket is still current), so the caller decides how requests are
//! scheduled while stale responses can never overwrite newer ones. `refresh`
//! runs the whole pipeline in order for callers that don't need that control.

use foundation::LatLon;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use routing::{
    AnalysisJob, AnalysisRequest, DensityReading, DensityRequest, DirectionsRequest,
    GeocodeResult, IsochroneRequest, MultiPolygon, RouteCollection, RoutingService, ServiceError,
    TravelProfile,
};
use runtime::{Event, EventBus, Frame, RequestSequencer, Ticket};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::PlannerConfig;
use crate::density::{DensitySample, agent_count_for};
use crate::format::{format_distance, format_duration};
use crate::geometry::{Blockage, BlockageKind, build_avoidance_set};
use crate::mode::{Mode, ModeState};
use crate::overlay::{OverlayInputs, OverlaySnapshot, build_overlays};
use crate::route::{ReachableArea, RouteGeometry, reachable_areas_from, routes_from_collection};
use crate::sampler::sample;
use crate::simulation::{Agent, AgentSimulator, speed_hint};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// User-visible message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(
        level: NoticeLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, title, description)
    }
}

/// Input rejected before any collaborator call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyQuery,
    MissingStart,
    MissingEnd,
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::EmptyQuery => write!(f, "search query is empty"),
            InputError::MissingStart => write!(f, "no start point set"),
            InputError::MissingEnd => write!(f, "no destination set"),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRoute {
    pub ticket: Ticket,
    pub request: DirectionsRequest,
}

/// Sampled points of the primary route awaiting traffic readings.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDensity {
    pub ticket: Ticket,
    pub points: Vec<LatLon>,
}

impl PendingDensity {
    pub fn request(&self) -> DensityRequest {
        DensityRequest {
            points: self.points.iter().map(|p| p.to_lat_lon()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub request: AnalysisRequest,
}

/// Formatted figures of the primary route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub duration: String,
    pub distance: String,
    /// Length of the drawn line, which can differ from the reported distance.
    pub measured_distance: String,
    pub route_count: usize,
    pub steps: usize,
}

pub struct Planner {
    config: PlannerConfig,
    mode: ModeState,
    start: Option<LatLon>,
    end: Option<LatLon>,
    blockages: Vec<Blockage>,
    profile: TravelProfile,
    routes: Vec<RouteGeometry>,
    density: Vec<DensitySample>,
    analysis: Option<AnalysisJob>,
    reachable: Vec<ReachableArea>,
    simulator: AgentSimulator,
    route_seq: RequestSequencer,
    density_seq: RequestSequencer,
    analysis_seq: RequestSequencer,
    notices: EventBus<Notice>,
    frame: Frame,
    rng: ChaCha8Rng,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            mode: ModeState::default(),
            start: None,
            end: None,
            blockages: Vec::new(),
            profile: config.profile.clone(),
            routes: Vec::new(),
            density: Vec::new(),
            analysis: None,
            reachable: Vec::new(),
            simulator: AgentSimulator::new(),
            route_seq: RequestSequencer::new(),
            density_seq: RequestSequencer::new(),
            analysis_seq: RequestSequencer::new(),
            notices: EventBus::new(),
            frame: Frame::first(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.emit(self.frame, notice);
    }

    pub fn set_start(&mut self, point: LatLon) {
        info!(start = %point, "start point set");
        self.start = Some(point);
        self.reachable.clear();
        self.notify(Notice::success("Start Point Set", point.to_string()));
    }

    pub fn set_end(&mut self, point: LatLon) {
        info!(end = %point, "destination set");
        self.end = Some(point);
        self.notify(Notice::success("Destination Set", point.to_string()));
    }

    /// Closes the ring if needed and appends the blockage.
    pub fn add_blockage(&mut self, kind: BlockageKind, points: &[LatLon]) {
        self.push_blockage(Blockage::new(kind, points));
    }

    pub fn push_blockage(&mut self, blockage: Blockage) {
        info!(
            kind = ?blockage.kind,
            vertices = blockage.ring().len(),
            total = self.blockages.len() + 1,
            "blockage added"
        );
        self.blockages.push(blockage);
        self.simulator.mark_hazards(&self.blockages);
        self.notify(Notice::success(
            "Obstacle Added",
            "The area will be avoided in route calculations.",
        ));
    }

    pub fn clear_blockages(&mut self) {
        info!(cleared = self.blockages.len(), "blockages cleared");
        self.blockages.clear();
        self.simulator.mark_hazards(&self.blockages);
        self.notify(Notice::info(
            "Obstacles Cleared",
            "All obstacles have been removed from the map.",
        ));
    }

    /// Avoidance polygons for the current blockages, `None` when there are none.
    pub fn avoidance_set(&self) -> Option<MultiPolygon> {
        build_avoidance_set(&self.blockages)
    }

    /// Reachable areas were computed for the old profile and are dropped.
    pub fn set_profile(&mut self, profile: TravelProfile) {
        debug!(%profile, "travel profile set");
        self.profile = profile;
        self.reachable.clear();
    }

    pub fn set_mode(&mut self, mode: Mode) {
        let Some(transition) = self.mode.set(mode) else {
            return;
        };
        info!(from = %transition.from, to = %transition.to, "mode changed");
        self.recompute_simulation();
    }

    /// Builds the directions request for the current start, end and blockages.
    pub fn prepare_route(&mut self) -> Result<PendingRoute, InputError> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => return Err(self.reject(InputError::MissingStart)),
            (_, None) => return Err(self.reject(InputError::MissingEnd)),
        };
        let request = DirectionsRequest {
            coordinates: vec![start.to_lon_lat(), end.to_lon_lat()],
            avoid_polygons: self.avoidance_set(),
            profile: self.profile.clone(),
        };
        let ticket = self.route_seq.issue();
        debug!(
            ticket = ticket.0,
            avoid = self.blockages.len(),
            "directions request prepared"
        );
        Ok(PendingRoute { ticket, request })
    }

    fn reject(&mut self, err: InputError) -> InputError {
        warn!(error = %err, "input rejected");
        let notice = match err {
            InputError::EmptyQuery => {
                Notice::error("Empty Search", "Please enter a location to search.")
            }
            InputError::MissingStart | InputError::MissingEnd => Notice::error(
                "Missing Points",
                "Please set both start and destination points.",
            ),
        };
        self.notify(notice);
        err
    }

    /// Folds a directions response in. Returns `false` when `ticket` was superseded.
    ///
    /// A failed call or a response without a usable line both leave the session
    /// without a route; density, analysis and agents are dropped with it.
    pub fn apply_route(
        &mut self,
        ticket: Ticket,
        result: Result<RouteCollection, ServiceError>,
    ) -> bool {
        if !self.route_seq.accept(ticket) {
            debug!(ticket = ticket.0, "stale directions response ignored");
            return false;
        }
        self.clear_route();

        let routes = match result {
            Ok(collection) => routes_from_collection(&collection),
            Err(err) => {
                warn!(error = %err, "directions request failed");
                Vec::new()
            }
        };

        if routes.is_empty() {
            self.notify(Notice::error(
                "Route Error",
                "Unable to calculate route. Please try different points.",
            ));
            return true;
        }

        self.routes = routes;
        let description = self
            .summary()
            .map(|s| format!("Distance: {}, Duration: {}", s.distance, s.duration))
            .unwrap_or_default();
        info!(routes = self.routes.len(), "route calculated");
        self.notify(Notice::success("Route Calculated", description));
        self.recompute_simulation();
        true
    }

    /// Drops the current route and everything derived from it. Density and
    /// analysis responses still in flight are superseded.
    pub fn clear_route(&mut self) {
        self.density_seq.invalidate();
        self.analysis_seq.invalidate();
        self.routes.clear();
        self.density.clear();
        self.analysis = None;
        self.simulator.clear();
    }

    /// Samples the primary route for a traffic query. `None` without a route.
    pub fn prepare_density(&mut self) -> Option<PendingDensity> {
        let primary = self.routes.first()?;
        let points = sample(primary.lon_lat(), self.config.sample_interval);
        if points.is_empty() {
            return None;
        }
        let ticket = self.density_seq.issue();
        debug!(ticket = ticket.0, points = points.len(), "density request prepared");
        Some(PendingDensity { ticket, points })
    }

    /// Readings are matched to the requested points by index. A point without a
    /// usable reading becomes a no-data sample at the requested location.
    pub fn apply_density(
        &mut self,
        pending: &PendingDensity,
        result: Result<Vec<DensityReading>, ServiceError>,
    ) -> bool {
        if !self.density_seq.accept(pending.ticket) {
            debug!(ticket = pending.ticket.0, "stale density response ignored");
            return false;
        }

        match result {
            Ok(readings) => {
                self.density = pending
                    .points
                    .iter()
                    .enumerate()
                    .map(|(i, &point)| match readings.get(i) {
                        Some(reading) if reading.error.is_none() => {
                            DensitySample::from_reading(reading, point)
                        }
                        _ => DensitySample::no_data(point),
                    })
                    .collect();
                debug!(samples = self.density.len(), "density applied");
            }
            Err(err) => {
                warn!(error = %err, "traffic density request failed");
                self.density.clear();
            }
        }
        self.recompute_simulation();
        true
    }

    /// Analysis is only requested in modes that show traffic.
    pub fn prepare_analysis(&mut self) -> Option<PendingAnalysis> {
        if !self.mode.current().wants_route_analysis() || self.routes.is_empty() {
            return None;
        }
        let (start, end) = (self.start?, self.end?);
        let ticket = self.analysis_seq.issue();
        Some(PendingAnalysis {
            ticket,
            request: AnalysisRequest {
                coordinates: vec![start.to_lon_lat(), end.to_lon_lat()],
            },
        })
    }

    pub fn apply_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<AnalysisJob, ServiceError>,
    ) -> bool {
        if !self.analysis_seq.accept(ticket) {
            return false;
        }
        self.analysis = match result {
            Ok(job) => {
                info!(job_id = %job.job_id, status = %job.status, "route analysis job received");
                Some(job)
            }
            Err(err) => {
                warn!(error = %err, "route analysis request failed");
                None
            }
        };
        true
    }

    pub async fn search<S>(
        &mut self,
        service: &S,
        query: &str,
    ) -> Result<Vec<GeocodeResult>, InputError>
    where
        S: RoutingService + ?Sized,
    {
        let query = query.trim();
        if query.is_empty() {
            return Err(self.reject(InputError::EmptyQuery));
        }

        let results = match service.geocode(query.to_string()).await {
            Ok(results) => results,
            Err(err) => {
                warn!(error = %err, query, "geocode request failed");
                Vec::new()
            }
        };
        if results.is_empty() {
            self.notify(Notice::info("No Results", "No locations found for your search."));
        } else {
            self.notify(Notice::success(
                "Search Results",
                format!("Found {} locations", results.len()),
            ));
        }
        Ok(results)
    }

    /// Areas reachable from the start point within the default travel windows.
    ///
    /// A failed call leaves no areas and emits an error notice.
    pub async fn reachable_areas<S>(
        &mut self,
        service: &S,
    ) -> Result<&[ReachableArea], InputError>
    where
        S: RoutingService + ?Sized,
    {
        let Some(start) = self.start else {
            return Err(self.reject(InputError::MissingStart));
        };
        let request = IsochroneRequest::new(start.to_lon_lat(), self.profile.clone());
        self.reachable = match service.isochrones(request).await {
            Ok(collection) => reachable_areas_from(&collection),
            Err(err) => {
                warn!(error = %err, "isochrone request failed");
                Vec::new()
            }
        };
        if self.reachable.is_empty() {
            self.notify(Notice::error(
                "Reachability Error",
                "Unable to compute reachable areas from the start point.",
            ));
        } else {
            info!(areas = self.reachable.len(), "reachable areas computed");
        }
        Ok(&self.reachable)
    }

    /// Terrain height at `point` in meters. `None` when the lookup fails or
    /// the point is outside dataset coverage.
    pub async fn elevation_at<S>(&self, service: &S, point: LatLon) -> Option<f64>
    where
        S: RoutingService + ?Sized,
    {
        match service.elevation(point.lat, point.lon).await {
            Ok(lookup) => lookup.elevation_m(),
            Err(err) => {
                warn!(error = %err, %point, "elevation lookup failed");
                None
            }
        }
    }

    /// Route, then analysis when the mode wants it, then density.
    pub async fn refresh<S>(&mut self, service: &S) -> Result<(), InputError>
    where
        S: RoutingService + ?Sized,
    {
        let pending = self.prepare_route()?;
        let result = service.directions(pending.request).await;
        if !self.apply_route(pending.ticket, result) || self.routes.is_empty() {
            return Ok(());
        }

        if let Some(pending) = self.prepare_analysis() {
            let result = service.route_analysis(pending.request).await;
            self.apply_analysis(pending.ticket, result);
        }

        if let Some(pending) = self.prepare_density() {
            let result = service.traffic_density(pending.request()).await;
            self.apply_density(&pending, result);
        }
        Ok(())
    }

    /// Re-seeds the agent set from the current mode, routes and density.
    fn recompute_simulation(&mut self) {
        if !self.mode.simulation_enabled() || self.routes.is_empty() {
            if self.simulator.is_active() {
                debug!("simulation cleared");
            }
            self.simulator.clear();
            return;
        }

        let count = agent_count_for(self.density.first(), &mut self.rng);
        let primary = &self.routes[0];
        let speed = speed_hint(
            primary.len(),
            primary.duration_s(),
            primary.distance_m(),
            &self.config,
        );
        self.simulator
            .initialize(self.routes.clone(), count, speed, &mut self.rng);
        self.simulator.mark_hazards(&self.blockages);
        info!(agents = self.simulator.agents().len(), speed, "simulation started");
    }

    /// Advances one logical step. Returns agent positions, empty when idle.
    pub fn tick(&mut self) -> Vec<LatLon> {
        self.frame = self.frame.next();
        if !self.simulator.is_active() {
            return Vec::new();
        }
        let positions = self.simulator.tick();
        self.simulator.mark_hazards(&self.blockages);
        positions
    }

    pub fn overlays(&self) -> OverlaySnapshot {
        build_overlays(&OverlayInputs {
            mode: self.mode.current(),
            routes: &self.routes,
            density: &self.density,
            blockages: &self.blockages,
            agents: self.simulator.agents(),
            reachable: &self.reachable,
            defense_radius_m: self.config.defense_radius_m,
        })
    }

    pub fn summary(&self) -> Option<TripSummary> {
        let primary = self.routes.first()?;
        Some(TripSummary {
            duration: format_duration(primary.duration_s()),
            distance: format_distance(primary.distance_m()),
            measured_distance: format_distance(primary.measured_length_m()),
            route_count: self.routes.len(),
            steps: primary.steps().len(),
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn start(&self) -> Option<LatLon> {
        self.start
    }

    pub fn end(&self) -> Option<LatLon> {
        self.end
    }

    pub fn blockages(&self) -> &[Blockage] {
        &self.blockages
    }

    pub fn profile(&self) -> &TravelProfile {
        &self.profile
    }

    pub fn routes(&self) -> &[RouteGeometry] {
        &self.routes
    }

    pub fn density(&self) -> &[DensitySample] {
        &self.density
    }

    pub fn analysis(&self) -> Option<&AnalysisJob> {
        self.analysis.as_ref()
    }

    pub fn reachable(&self) -> &[ReachableArea] {
        &self.reachable
    }

    pub fn agents(&self) -> &[Agent] {
        self.simulator.agents()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn notices(&self) -> &[Event<Notice>] {
        self.notices.events()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn drain_notices(&mut self) -> Vec<Event<Notice>> {
        self.notices.drain()
    }
}
