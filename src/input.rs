//! Per-frame input snapshot supplied by the host

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Device-independent input for one frame.
///
/// On foot, `move_axis` is a world-space direction. While driving, `y` is
/// throttle and `x` is steering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_axis: Vec2,
    pub aim: Vec2,
    pub fire: bool,
    /// Edge-triggered: enter or exit a vehicle
    pub interact: bool,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Move axis with non-finite components zeroed and length clamped to 1.
    pub fn sanitized_move(&self) -> Vec2 {
        sanitize_axis(self.move_axis)
    }

    pub fn sanitized_aim(&self) -> Vec2 {
        sanitize_axis(self.aim)
    }
}

fn sanitize_axis(v: Vec2) -> Vec2 {
    if !v.is_finite() {
        return Vec2::ZERO;
    }
    v.clamp_length_max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_sanitizing() {
        let input = InputSnapshot {
            move_axis: Vec2::new(3.0, 4.0),
            aim: Vec2::new(f32::NAN, 1.0),
            ..Default::default()
        };
        assert!((input.sanitized_move().length() - 1.0).abs() < 1e-5);
        assert_eq!(input.sanitized_aim(), Vec2::ZERO);
    }
}
