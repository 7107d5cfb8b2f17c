//! Derived display layers. Recomputed on demand from planner state.

use std::ops::Range;

use foundation::{AgentId, LatLon};
use serde::Serialize;

use crate::density::{DensitySample, Tier, agent_count_hint, classify};
use crate::geometry::Blockage;
use crate::mode::{Mode, OverlayFlags};
use crate::route::{ReachableArea, RouteGeometry};
use crate::simulation::Agent;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityMarker {
    pub location: LatLon,
    pub tier: Tier,
    pub color: &'static str,
    pub current_speed: Option<f64>,
    pub free_flow_speed: Option<f64>,
    pub confidence: Option<f64>,
    pub crowd_range: Range<usize>,
}

impl DensityMarker {
    pub fn from_sample(sample: &DensitySample) -> Self {
        let tier = classify(sample);
        Self {
            location: sample.location,
            tier,
            color: tier.color(),
            current_speed: sample.current_speed,
            free_flow_speed: sample.free_flow_speed,
            confidence: sample.confidence,
            crowd_range: agent_count_hint(tier),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct DefenseZone {
    pub center: LatLon,
    pub radius_m: f64,
}

/// One zone per blockage, centered on its first vertex.
pub fn defense_zones(blockages: &[Blockage], radius_m: f64) -> Vec<DefenseZone> {
    blockages
        .iter()
        .filter_map(Blockage::anchor)
        .map(|center| DefenseZone { center, radius_m })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentMarker {
    pub id: AgentId,
    pub position: LatLon,
    pub color: &'static str,
    pub in_hazard: bool,
}

impl From<&Agent> for AgentMarker {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            position: agent.position,
            color: agent.color,
            in_hazard: agent.in_hazard,
        }
    }
}

/// Everything the map view draws for the current mode.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OverlaySnapshot {
    pub mode: Mode,
    pub flags: OverlayFlags,
    pub routes: Vec<Vec<LatLon>>,
    pub density: Vec<DensityMarker>,
    pub defense_zones: Vec<DefenseZone>,
    pub agents: Vec<AgentMarker>,
    /// Shown in every mode once computed.
    pub reachable: Vec<ReachableArea>,
}

/// Inputs for [`build_overlays`].
pub struct OverlayInputs<'a> {
    pub mode: Mode,
    pub routes: &'a [RouteGeometry],
    pub density: &'a [DensitySample],
    pub blockages: &'a [Blockage],
    pub agents: &'a [Agent],
    pub reachable: &'a [ReachableArea],
    pub defense_radius_m: f64,
}

/// Layers not enabled by the mode are left empty.
pub fn build_overlays(inputs: &OverlayInputs<'_>) -> OverlaySnapshot {
    let flags = inputs.mode.overlays();
    let mut snapshot = OverlaySnapshot {
        mode: inputs.mode,
        flags,
        routes: inputs.routes.iter().map(|r| r.path().to_vec()).collect(),
        reachable: inputs.reachable.to_vec(),
        ..OverlaySnapshot::default()
    };
    if flags.density {
        snapshot.density = inputs.density.iter().map(DensityMarker::from_sample).collect();
    }
    if flags.defense_zones {
        snapshot.defense_zones = defense_zones(inputs.blockages, inputs.defense_radius_m);
    }
    if flags.agents {
        snapshot.agents = inputs.agents.iter().map(AgentMarker::from).collect();
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn square() -> Blockage {
        Blockage::rectangle(LatLon::new(1.0, 1.0), LatLon::new(2.0, 2.0))
    }

    fn inputs<'a>(
        mode: Mode,
        routes: &'a [RouteGeometry],
        density: &'a [DensitySample],
        blockages: &'a [Blockage],
    ) -> OverlayInputs<'a> {
        OverlayInputs {
            mode,
            routes,
            density,
            blockages,
            agents: &[],
            reachable: &[],
            defense_radius_m: 300.0,
        }
    }

    #[test]
    fn defense_zone_sits_on_first_vertex() {
        let zones = defense_zones(&[square()], 300.0);
        assert_eq!(
            zones,
            vec![DefenseZone {
                center: LatLon::new(1.0, 1.0),
                radius_m: 300.0
            }]
        );
        assert!(defense_zones(&[], 300.0).is_empty());
    }

    #[test]
    fn layers_are_gated_by_mode() {
        let routes = [RouteGeometry::new(
            vec![LatLon::new(0.0, 0.0), LatLon::new(1.0, 1.0)],
            60.0,
            100.0,
        )];
        let density = [DensitySample {
            current_speed: Some(4.0),
            ..DensitySample::no_data(LatLon::new(0.0, 0.0))
        }];
        let blockages = [square()];

        let evacuate = build_overlays(&inputs(Mode::Evacuate, &routes, &density, &blockages));
        assert_eq!(evacuate.routes.len(), 1);
        assert!(evacuate.density.is_empty());
        assert!(evacuate.defense_zones.is_empty());

        let heatmap = build_overlays(&inputs(Mode::Heatmap, &routes, &density, &blockages));
        assert_eq!(heatmap.density.len(), 1);
        assert_eq!(heatmap.density[0].tier, Tier::Heavy);
        assert_eq!(heatmap.density[0].color, "#ff0000");
        assert_eq!(heatmap.density[0].crowd_range, 15..20);
        assert!(heatmap.defense_zones.is_empty());

        let defense = build_overlays(&inputs(Mode::Defense, &routes, &density, &blockages));
        assert_eq!(defense.defense_zones.len(), 1);
        assert!(defense.density.is_empty());
    }

    #[test]
    fn missing_speed_renders_neutral() {
        let marker = DensityMarker::from_sample(&DensitySample::no_data(LatLon::new(3.0, 4.0)));
        assert_eq!(marker.tier, Tier::NoData);
        assert_eq!(marker.color, "#555555");
        assert_eq!(marker.current_speed, None);
    }
}
