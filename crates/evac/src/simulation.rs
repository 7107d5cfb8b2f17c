//! Crowd agents moving along route polylines.
//!
//! Progress is measured in segment units: the integer part indexes a route
//! segment, the fractional part is the interpolation ratio within it. One
//! `tick` is one fixed logical step; frame pacing belongs to the renderer.

use foundation::{AgentId, LatLon};
use rand::Rng;
use serde::Serialize;

use crate::config::PlannerConfig;
use crate::geometry::Blockage;
use crate::route::RouteGeometry;

/// Agents start somewhere in the first few segments so they do not move in lockstep.
pub const START_STAGGER: f64 = 5.0;
/// Per-agent speed factor is drawn from `[1 - SPEED_JITTER, 1 + SPEED_JITTER)`.
pub const SPEED_JITTER: f64 = 0.2;

pub const AGENT_PALETTE: [&str; 5] = ["#3388ff", "#ff3300", "#33cc33", "#ffcc00", "#cc33ff"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    pub id: AgentId,
    /// Index into the simulator's routes.
    pub route: usize,
    pub progress: f64,
    /// Segment units per tick.
    pub speed: f64,
    pub color: &'static str,
    pub position: LatLon,
    /// Inside a blockage after the last hazard pass.
    pub in_hazard: bool,
}

/// Base agent speed for a route.
///
/// With a reported duration and distance, the speed is chosen so agents cover
/// the route in about the reported time, scaled by
/// `frames_per_route_second` and clamped to `[min_speed, max_speed]`.
/// Otherwise `default_speed`.
pub fn speed_hint(
    point_count: usize,
    duration_s: f64,
    distance_m: f64,
    cfg: &PlannerConfig,
) -> f64 {
    if !(duration_s > 0.0 && distance_m > 0.0) {
        return cfg.default_speed;
    }
    let frames = duration_s * cfg.frames_per_route_second;
    let speed = point_count as f64 / frames;
    speed.clamp(cfg.min_speed, cfg.max_speed)
}

#[derive(Debug, Default, Clone)]
pub struct AgentSimulator {
    routes: Vec<RouteGeometry>,
    agents: Vec<Agent>,
}

impl AgentSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the agent set.
    ///
    /// `count` is spread over `routes` by ceil-division, so every route but the
    /// last gets `ceil(count / routes)` agents and the last gets the remainder.
    /// Routes without any points keep their share unspawned.
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        routes: Vec<RouteGeometry>,
        count: usize,
        speed_hint: f64,
        rng: &mut R,
    ) -> &[Agent] {
        self.agents.clear();
        self.routes = routes;
        if self.routes.is_empty() || count == 0 {
            return &self.agents;
        }

        let per_route = count.div_ceil(self.routes.len());
        let mut remaining = count;
        let mut next_id = 0u32;

        for (route_index, route) in self.routes.iter().enumerate() {
            let share = per_route.min(remaining);
            remaining -= share;
            let Some(start) = route.start() else {
                continue;
            };
            for _ in 0..share {
                let progress = rng.gen_range(0.0..START_STAGGER);
                let factor = rng.gen_range((1.0 - SPEED_JITTER)..(1.0 + SPEED_JITTER));
                self.agents.push(Agent {
                    id: AgentId::new(next_id),
                    route: route_index,
                    progress,
                    speed: speed_hint * factor,
                    color: AGENT_PALETTE[next_id as usize % AGENT_PALETTE.len()],
                    position: start,
                    in_hazard: false,
                });
                next_id += 1;
            }
        }

        &self.agents
    }

    /// Advances every agent one step and returns all positions in agent order.
    ///
    /// Agents that run past the last segment restart at the route start. Agents
    /// whose route has fewer than two points stay where they are.
    pub fn tick(&mut self) -> Vec<LatLon> {
        for agent in &mut self.agents {
            let Some(route) = self.routes.get(agent.route) else {
                continue;
            };
            let path = route.path();
            if path.len() < 2 {
                continue;
            }

            let progress = agent.progress + agent.speed;
            let segment = progress.floor();
            if !segment.is_finite() || segment >= (path.len() - 1) as f64 {
                agent.progress = 0.0;
                agent.position = path[0];
                continue;
            }

            let index = segment as usize;
            agent.progress = progress;
            agent.position = path[index].lerp(path[index + 1], progress - segment);
        }

        self.positions()
    }

    /// Flags agents standing inside any blockage. Returns how many are flagged.
    pub fn mark_hazards(&mut self, blockages: &[Blockage]) -> usize {
        let mut flagged = 0;
        for agent in &mut self.agents {
            agent.in_hazard = blockages.iter().any(|b| b.contains(agent.position));
            if agent.in_hazard {
                flagged += 1;
            }
        }
        flagged
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        self.routes.clear();
    }

    pub fn positions(&self) -> Vec<LatLon> {
        self.agents.iter().map(|a| a.position).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.agents.is_empty()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn routes(&self) -> &[RouteGeometry] {
        &self.routes
    }
}
