//! Death state machine for enemies
//!
//! Alive -> {Shot, Burning, Electrified, Exploded, DyingAsh} -> Dead.
//! The dying timestamp is captured once on the first transition out of
//! Alive. Finalization side effects are each guarded by a flag that
//! persists on the record until the slot is reused.

use crate::content::DamageElement;
use crate::core::config::DeathTuning;
use crate::core::types::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeathState {
    #[default]
    Alive,
    Shot,
    Burning,
    Electrified,
    Exploded,
    DyingAsh,
    Dead,
}

impl DeathState {
    pub fn is_alive(&self) -> bool {
        matches!(self, DeathState::Alive)
    }

    /// Transient states between Alive and Dead
    pub fn is_dying(&self) -> bool {
        !matches!(self, DeathState::Alive | DeathState::Dead)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeathState::Dead)
    }

    /// Dying state entered when a hit of this element kills.
    pub fn from_element(element: DamageElement) -> Self {
        match element {
            DamageElement::Kinetic => DeathState::Shot,
            DamageElement::Fire => DeathState::Burning,
            DamageElement::Shock => DeathState::Electrified,
            DamageElement::Plasma => DeathState::DyingAsh,
        }
    }

    /// Grace period for this state. Explosions leave nothing on screen to
    /// linger over, so they use the lean period.
    pub fn grace_ms(&self, tuning: &DeathTuning) -> u64 {
        match self {
            DeathState::Exploded => tuning.lean_grace_ms,
            _ => tuning.standard_grace_ms,
        }
    }
}

/// One-shot finalization side effects already fired for this occupant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinalizeFlags {
    pub corpse: bool,
    pub ash: bool,
    pub debris: bool,
    pub decal: bool,
    pub rewarded: bool,
}

impl FinalizeFlags {
    /// Set `flag` and report whether this call was the one that set it.
    #[inline]
    pub fn fire_once(flag: &mut bool) -> bool {
        !std::mem::replace(flag, true)
    }
}

/// Death bookkeeping carried by every enemy record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeathRecord {
    pub state: DeathState,
    /// When the entity left Alive
    pub since: Option<Millis>,
    /// Grace period captured together with `since`
    pub grace_ms: u64,
    pub fired: FinalizeFlags,
}

impl DeathRecord {
    /// Leave Alive for `state`. Only the first transition counts: the
    /// timestamp and grace period are never re-captured.
    pub fn begin(&mut self, state: DeathState, now: Millis, grace_ms: u64) -> bool {
        if !self.state.is_alive() || state.is_alive() {
            return false;
        }
        self.state = state;
        self.since = Some(now);
        self.grace_ms = grace_ms;
        true
    }

    /// Absolute time at which the entity is due for finalization.
    pub fn due_at(&self) -> Option<Millis> {
        self.since.map(|t| t.saturating_add(self.grace_ms))
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.state.is_dying() && self.due_at().map(|t| now >= t).unwrap_or(false)
    }

    pub fn mark_dead(&mut self) {
        self.state = DeathState::Dead;
    }
}
