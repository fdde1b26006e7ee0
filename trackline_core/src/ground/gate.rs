// trackline_core/src/ground/gate.rs

use tracing::trace;

use crate::types::{angle_between_deg, UnitVector};

/// Holds back large changes of the accepted up until they have persisted.
///
/// A candidate more than `trigger_deg` away from the previous up counts as a
/// big change. Big changes are replaced by the previous up until
/// `accept_frames` of them have arrived in a row; from then on they pass while
/// they keep arriving. Any small change resets the count. `accept_frames` of
/// `0` or `1` passes everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeGate {
    streak: u32,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive big changes seen so far, saturating at the accept count.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn apply(
        &mut self,
        candidate: &UnitVector,
        previous_up: &UnitVector,
        trigger_deg: f64,
        accept_frames: u32,
    ) -> UnitVector {
        if accept_frames <= 1 {
            self.streak = 0;
            return *candidate;
        }
        let change_deg = angle_between_deg(candidate, previous_up);
        if change_deg <= trigger_deg {
            self.streak = 0;
            return *candidate;
        }

        self.streak = (self.streak + 1).min(accept_frames);
        if self.streak >= accept_frames {
            *candidate
        } else {
            trace!(change_deg, streak = self.streak, "big up change not yet persistent");
            *previous_up
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{world_up, Vector};

    fn tilted(deg: f64) -> UnitVector {
        let r = deg.to_radians();
        UnitVector::new_normalize(Vector::new(r.sin(), 0.0, r.cos()))
    }

    #[test]
    fn disabled_gate_passes_everything() {
        let mut gate = ChangeGate::new();
        let candidate = tilted(40.0);
        assert_eq!(gate.apply(&candidate, &world_up(), 10.0, 0), candidate);
        assert_eq!(gate.apply(&candidate, &world_up(), 10.0, 1), candidate);
    }

    #[test]
    fn big_change_must_persist() {
        let mut gate = ChangeGate::new();
        let candidate = tilted(20.0);
        for _ in 0..4 {
            assert_eq!(gate.apply(&candidate, &world_up(), 10.0, 5), world_up());
        }
        assert_eq!(gate.apply(&candidate, &world_up(), 10.0, 5), candidate);
        // Keeps passing while the change persists.
        assert_eq!(gate.apply(&candidate, &world_up(), 10.0, 5), candidate);
        assert_eq!(gate.streak(), 5);
    }

    #[test]
    fn small_change_resets_streak() {
        let mut gate = ChangeGate::new();
        let big = tilted(20.0);
        let small = tilted(5.0);
        gate.apply(&big, &world_up(), 10.0, 3);
        gate.apply(&big, &world_up(), 10.0, 3);
        assert_eq!(gate.apply(&small, &world_up(), 10.0, 3), small);
        assert_eq!(gate.streak(), 0);
        assert_eq!(gate.apply(&big, &world_up(), 10.0, 3), world_up());
    }
}
