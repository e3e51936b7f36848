//! Impact tier classification

use crate::core::config::CollisionTuning;

/// Severity class of a ram, keyed on squared relative speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImpactTier {
    Push,
    Knockback,
    Splatter,
}

impl ImpactTier {
    /// Classify a contact by `v²`. `None` means too slow to matter.
    ///
    /// Thresholds are exclusive: exactly 36 is still a push.
    pub fn classify(speed_sq: f32, tuning: &CollisionTuning) -> Option<ImpactTier> {
        if !speed_sq.is_finite() {
            return None;
        }
        if speed_sq > tuning.splatter_speed_sq {
            Some(ImpactTier::Splatter)
        } else if speed_sq > tuning.knockback_speed_sq {
            Some(ImpactTier::Knockback)
        } else if speed_sq > tuning.push_speed_sq {
            Some(ImpactTier::Push)
        } else {
            None
        }
    }
}

/// `speed * mass * collision_damage_multiplier * k`
#[inline]
pub fn base_damage(speed: f32, mass: f32, damage_multiplier: f32, k: f32) -> f32 {
    speed * mass * damage_multiplier * k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let tuning = CollisionTuning::default();
        assert_eq!(ImpactTier::classify(0.0, &tuning), None);
        assert_eq!(ImpactTier::classify(4.0, &tuning), None);
        assert_eq!(ImpactTier::classify(5.0, &tuning), Some(ImpactTier::Push));
        assert_eq!(ImpactTier::classify(36.0, &tuning), Some(ImpactTier::Push));
        assert_eq!(ImpactTier::classify(40.0, &tuning), Some(ImpactTier::Knockback));
        assert_eq!(ImpactTier::classify(144.0, &tuning), Some(ImpactTier::Knockback));
        assert_eq!(ImpactTier::classify(150.0, &tuning), Some(ImpactTier::Splatter));
        assert_eq!(ImpactTier::classify(f32::NAN, &tuning), None);
    }

    #[test]
    fn test_tiers_follow_configuration() {
        let tuning = CollisionTuning {
            push_speed_sq: 1.0,
            knockback_speed_sq: 2.0,
            splatter_speed_sq: 3.0,
            ..CollisionTuning::default()
        };
        assert_eq!(ImpactTier::classify(5.0, &tuning), Some(ImpactTier::Splatter));
    }

    #[test]
    fn test_base_damage_is_a_product() {
        assert_eq!(base_damage(6.0, 12.0, 1.0, 0.5), 36.0);
        assert_eq!(base_damage(0.0, 12.0, 1.0, 0.5), 0.0);
    }
}
