//! Keyboard driven inference locks.
//!
//! Two kinds of lock exist. Holding the constrain key locks inference to
//! the current pick ("free" lock) and releasing it unlocks. Pressing an axis
//! key locks to that model axis through the start pick and pressing the
//! same key again unlocks. An axis lock wins: it replaces a held free lock
//! and the constrain key does nothing while one is engaged.

use crate::config::KeyBindings;
use crate::host::{Host, Key, LockAnchors};
use tape_math::{Axis, Dir3, Point3};
use tape_pick::PickPoint;

/// The picks a lock can anchor to.
pub trait LockTarget {
    /// The pick the pointer is currently resolving.
    fn current_pick(&self) -> &PickPoint;

    /// The measurement's start pick. Before a start point is fixed this is
    /// the current pick.
    fn start_pick(&self) -> &PickPoint {
        self.current_pick()
    }
}

/// An engaged axis lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLock {
    /// Locked axis.
    pub axis: Axis,
    /// Point the locked line passes through.
    pub origin: Point3,
    /// Direction of the locked line.
    pub direction: Dir3,
}

/// Last known pointer position, replayed when a lock changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Screen x.
    pub x: f64,
    /// Screen y.
    pub y: f64,
}

/// Result of feeding a key to the lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    /// The key does not concern the lock, or changed nothing.
    Ignored,
    /// The lock state changed. The pick under `replay` must be re-resolved
    /// so the new lock takes effect without waiting for the pointer to move.
    Changed {
        /// Pointer position to re-resolve, if the pointer has been seen.
        replay: Option<Pointer>,
    },
}

/// Inference lock state of one tool.
#[derive(Debug, Clone, Default)]
pub struct InferenceLock {
    axis_lock: Option<AxisLock>,
    free_lock: Option<Point3>,
    pointer: Option<Pointer>,
}

impl InferenceLock {
    /// Unlocked, with no pointer seen yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the pointer position.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        self.pointer = Some(Pointer { x, y });
    }

    /// The last pointer position.
    pub fn pointer(&self) -> Option<Pointer> {
        self.pointer
    }

    /// The engaged axis lock.
    pub fn axis_lock(&self) -> Option<&AxisLock> {
        self.axis_lock.as_ref()
    }

    /// Where the held free lock was taken.
    pub fn free_lock(&self) -> Option<Point3> {
        self.free_lock
    }

    /// Whether either lock is engaged.
    pub fn is_engaged(&self) -> bool {
        self.axis_lock.is_some() || self.free_lock.is_some()
    }

    /// Drop both locks and release the host's inference.
    pub fn release(&mut self, host: &mut dyn Host) {
        if self.is_engaged() {
            log::debug!("inference lock released");
        }
        self.axis_lock = None;
        self.free_lock = None;
        host.lock_inference(LockAnchors::None);
    }

    /// Handle a key press.
    pub fn on_key_down(
        &mut self,
        key: Key,
        keys: &KeyBindings,
        target: &dyn LockTarget,
        host: &mut dyn Host,
    ) -> KeyOutcome {
        let changed = if key == keys.constrain {
            self.engage_free(target, host)
        } else if let Some(axis) = keys.axis_for(key) {
            self.toggle_axis(axis, target, host)
        } else {
            false
        };
        self.outcome(changed)
    }

    /// Handle a key release. Only the constrain key acts on release.
    pub fn on_key_up(&mut self, key: Key, keys: &KeyBindings, host: &mut dyn Host) -> KeyOutcome {
        let changed = key == keys.constrain && self.release_free(host);
        self.outcome(changed)
    }

    fn outcome(&self, changed: bool) -> KeyOutcome {
        if changed {
            KeyOutcome::Changed {
                replay: self.pointer,
            }
        } else {
            KeyOutcome::Ignored
        }
    }

    fn engage_free(&mut self, target: &dyn LockTarget, host: &mut dyn Host) -> bool {
        if self.axis_lock.is_some() || self.free_lock.is_some() {
            return false;
        }
        let pick = target.current_pick();
        let Some(position) = pick.position() else {
            return false;
        };
        log::debug!("inference locked to pick at {position}");
        self.free_lock = Some(position);
        host.lock_inference(LockAnchors::Pick(pick.clone()));
        true
    }

    fn release_free(&mut self, host: &mut dyn Host) -> bool {
        if self.axis_lock.is_some() || self.free_lock.take().is_none() {
            return false;
        }
        log::debug!("inference free lock released");
        host.lock_inference(LockAnchors::None);
        true
    }

    fn toggle_axis(&mut self, axis: Axis, target: &dyn LockTarget, host: &mut dyn Host) -> bool {
        let Some(origin) = target.start_pick().position() else {
            return false;
        };

        if self
            .axis_lock
            .is_some_and(|lock| lock.axis == axis && lock.origin == origin)
        {
            log::debug!("{axis:?} axis lock released");
            self.axis_lock = None;
            host.lock_inference(LockAnchors::None);
            return true;
        }

        let direction = host.axes().direction(axis);
        log::debug!("inference locked to {axis:?} axis through {origin}");
        self.axis_lock = Some(AxisLock {
            axis,
            origin,
            direction,
        });
        self.free_lock = None;
        host.lock_inference(LockAnchors::Line {
            start: origin,
            end: origin + direction.into_inner(),
        });
        true
    }
}
