#![warn(missing_docs)]

//! Interpreting host picks.
//!
//! The host resolves a screen position to a [`RawPick`]: a world position,
//! a degrees-of-freedom hint and whatever edge, face and instance path were
//! under the pointer. Those references are loose: a pick on a free standing
//! edge can still report the face behind it. [`ConstraintResolver`] keeps
//! only the references the pick actually lies on and derives the line or
//! plane the pick is constrained to, producing an immutable [`PickPoint`].

pub mod pick;
pub mod resolver;

pub use pick::{
    DegreesOfFreedom, EdgeRef, EntityId, FaceRef, InstanceRef, PickPoint, PickSource, RawPick,
};
pub use resolver::ConstraintResolver;
