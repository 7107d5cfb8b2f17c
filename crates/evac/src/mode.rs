use serde::{Deserialize, Serialize};

/// Top-level map mode. Exactly one is active at a time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Evacuate,
    Heatmap,
    Defense,
    Crowd,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Evacuate, Mode::Heatmap, Mode::Defense, Mode::Crowd];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Evacuate => "evacuate",
            Mode::Heatmap => "heatmap",
            Mode::Defense => "defense",
            Mode::Crowd => "crowd",
        }
    }

    pub fn overlays(self) -> OverlayFlags {
        OverlayFlags {
            density: self == Mode::Heatmap,
            defense_zones: self == Mode::Defense,
            agents: self == Mode::Crowd,
        }
    }

    /// Modes that request a traffic analysis job alongside the route.
    pub fn wants_route_analysis(self) -> bool {
        matches!(self, Mode::Heatmap | Mode::Crowd)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl std::fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown mode `{}` (expected evacuate, heatmap, defense or crowd)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMode {}

impl std::str::FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Which derived layers a mode shows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OverlayFlags {
    pub density: bool,
    pub defense_zones: bool,
    pub agents: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: Mode,
    pub to: Mode,
}

/// Mode selector. Every transition is allowed; side effects are applied by
/// the owner based on the returned [`ModeTransition`].
#[derive(Debug, Default, Clone)]
pub struct ModeState {
    mode: Mode,
}

impl ModeState {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn current(&self) -> Mode {
        self.mode
    }

    /// Returns `None` when `mode` is already active.
    pub fn set(&mut self, mode: Mode) -> Option<ModeTransition> {
        if mode == self.mode {
            return None;
        }
        let from = std::mem::replace(&mut self.mode, mode);
        Some(ModeTransition { from, to: mode })
    }

    pub fn overlays(&self) -> OverlayFlags {
        self.mode.overlays()
    }

    pub fn simulation_enabled(&self) -> bool {
        self.mode == Mode::Crowd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transition_is_allowed() {
        let mut state = ModeState::default();
        assert_eq!(state.current(), Mode::Evacuate);
        for from in Mode::ALL {
            for to in Mode::ALL {
                state.set(from);
                let t = state.set(to);
                if from == to {
                    assert_eq!(t, None);
                } else {
                    assert_eq!(t, Some(ModeTransition { from, to }));
                }
                assert_eq!(state.current(), to);
            }
        }
    }

    #[test]
    fn overlays_per_mode() {
        assert_eq!(Mode::Evacuate.overlays(), OverlayFlags::default());
        assert!(Mode::Heatmap.overlays().density);
        assert!(!Mode::Heatmap.overlays().agents);
        assert!(Mode::Defense.overlays().defense_zones);
        assert!(Mode::Crowd.overlays().agents);
        assert!(!Mode::Crowd.overlays().density);
    }

    #[test]
    fn only_crowd_runs_the_simulation() {
        for mode in Mode::ALL {
            assert_eq!(ModeState::new(mode).simulation_enabled(), mode == Mode::Crowd);
        }
    }

    #[test]
    fn analysis_only_for_traffic_modes() {
        assert!(Mode::Heatmap.wants_route_analysis());
        assert!(Mode::Crowd.wants_route_analysis());
        assert!(!Mode::Evacuate.wants_route_analysis());
        assert!(!Mode::Defense.wants_route_analysis());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Crowd".parse::<Mode>(), Ok(Mode::Crowd));
        assert_eq!(" heatmap ".parse::<Mode>(), Ok(Mode::Heatmap));
        assert!("panic".parse::<Mode>().is_err());
        assert_eq!(Mode::Defense.to_string(), "defense");
    }
}
