//! Frame scheduler
//!
//! Systems run in registration order, once per frame, over the session
//! they borrow. Order is a composition-time contract: the default install
//! runs spawn before movement, movement before the grid rebuild, and the
//! grid rebuild before anything that queries it.

use crate::core::clock::SimClock;
use crate::core::types::Millis;

use super::session::Session;

/// One per-frame update pass over the session.
pub trait System {
    fn name(&self) -> &'static str;

    /// Called once when the system is registered.
    fn init(&mut self, _session: &mut Session) {}

    fn update(&mut self, session: &mut Session, dt: f32, now: Millis);

    /// Called once when the system is removed or the scheduler disposed.
    fn cleanup(&mut self, _session: &mut Session) {}
}

/// Identifier returned by [`Scheduler::add_system`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(u32);

struct Registered {
    id: SystemId,
    system: Box<dyn System>,
}

pub struct Scheduler {
    systems: Vec<Registered>,
    clock: SimClock,
    next_id: u32,
}

impl Scheduler {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            systems: Vec::new(),
            clock: SimClock::new(max_frame_dt),
            next_id: 0,
        }
    }

    /// Scheduler using the session's frame configuration.
    pub fn for_session(session: &Session) -> Self {
        Self::new(session.config.frame.max_frame_dt)
    }

    /// Append `system` and run its `init` against `session`.
    pub fn add_system(&mut self, session: &mut Session, mut system: Box<dyn System>) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        system.init(session);
        tracing::debug!(system = system.name(), id = id.0, "system registered");
        self.systems.push(Registered { id, system });
        id
    }

    /// Run `cleanup` and drop the system. Returns false for an unknown id.
    pub fn remove_system(&mut self, session: &mut Session, id: SystemId) -> bool {
        let Some(pos) = self.systems.iter().position(|r| r.id == id) else {
            return false;
        };
        let mut entry = self.systems.remove(pos);
        entry.system.cleanup(session);
        tracing::debug!(system = entry.system.name(), id = id.0, "system removed");
        true
    }

    /// Advance the clock by `dt` seconds and run every system once.
    ///
    /// Non-finite or negative `dt` contributes nothing; large steps are
    /// clamped to the configured maximum. Returns the new `now`.
    pub fn update(&mut self, session: &mut Session, dt: f32) -> Millis {
        let (dt, now) = self.clock.advance(dt);
        session.world.now = now;
        session.world.frame += 1;
        for entry in self.systems.iter_mut() {
            entry.system.update(session, dt, now);
        }
        now
    }

    /// Clean up and drop every system.
    pub fn dispose(&mut self, session: &mut Session) {
        for mut entry in self.systems.drain(..) {
            entry.system.cleanup(session);
        }
        tracing::debug!("scheduler disposed");
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Names in execution order.
    pub fn system_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|r| r.system.name())
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.system_names().collect::<Vec<_>>())
            .field("now", &self.clock.now())
            .finish()
    }
}
