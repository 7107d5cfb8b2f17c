use foundation::time::Time;

/// One logical animation step.
///
/// The renderer owns real frame scheduling; the core only counts steps. `dt_s`
/// is carried for display purposes and never scales movement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Nominal seconds per frame.
    pub dt_s: f64,
    /// Logical time at the start of the frame.
    pub time: Time,
}

/// Nominal display rate used when converting durations into frame counts.
pub const NOMINAL_FPS: f64 = 60.0;

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first() -> Self {
        Self::new(0, 1.0 / NOMINAL_FPS)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first()
    }
}
