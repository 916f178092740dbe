//! Deriving constraints from raw picks.

use crate::pick::{DegreesOfFreedom, EdgeRef, FaceRef, PickPoint, RawPick};
use tape_math::{Axes, Axis, Dir3, Point3, Tolerance, Transform};

/// Turns host picks into [`PickPoint`]s.
///
/// Edge and face references are confirmed in the pick's local frame, before
/// the instance transform is applied, and only then carried into world
/// space. A line constraint comes from the confirmed edge, or failing that
/// from a model axis through the pick. A plane constraint comes from the
/// confirmed face's normal, transformed as a normal.
#[derive(Debug, Clone)]
pub struct ConstraintResolver {
    axes: Axes,
    tolerance: Tolerance,
}

impl ConstraintResolver {
    /// Resolver for a model with the given axis triad.
    pub fn new(axes: Axes) -> Self {
        Self {
            axes,
            tolerance: Tolerance::DEFAULT,
        }
    }

    /// The axis triad axis constraints are taken from.
    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    /// Resolve a host pick. An invalid pick resolves to
    /// [`PickPoint::invalid`].
    pub fn resolve(&self, raw: &RawPick) -> PickPoint {
        if !raw.valid {
            return PickPoint::invalid();
        }

        let local = match raw.transform.inverse() {
            Some(inv) => Some(inv.apply_point(&raw.position)),
            None => {
                log::warn!("pick transform is not invertible, ignoring its edge and face");
                None
            }
        };

        let source_edge = local
            .and_then(|p| raw.edge.as_ref().filter(|edge| self.edge_contains(edge, &p)))
            .cloned();
        let source_face = local
            .and_then(|p| raw.face.as_ref().filter(|face| self.face_contains(face, &p)))
            .cloned();

        let mut axis = None;
        let freedom_constraint = match raw.degrees_of_freedom {
            DegreesOfFreedom::Free => None,
            DegreesOfFreedom::Line => match &source_edge {
                Some(edge) => world_direction(edge, &raw.transform),
                None => {
                    axis = self.axis_through(&raw.position);
                    axis.map(|a| self.axes.direction(a))
                }
            },
            DegreesOfFreedom::Plane => source_face
                .as_ref()
                .and_then(|face| world_normal(face, &raw.transform)),
        };

        PickPoint {
            valid: true,
            position: raw.position,
            degrees_of_freedom: raw.degrees_of_freedom,
            freedom_constraint,
            axis,
            source_edge,
            source_face,
            instance: raw.instance_path.first().cloned(),
            transform: raw.transform.clone(),
            tooltip: raw.tooltip.clone(),
        }
    }

    fn edge_contains(&self, edge: &EdgeRef, local: &Point3) -> bool {
        edge.line()
            .is_some_and(|line| line.contains(local, &self.tolerance))
    }

    fn face_contains(&self, face: &FaceRef, local: &Point3) -> bool {
        face.plane.contains(local, &self.tolerance)
    }

    /// First model axis whose line through the triad origin contains `p`.
    fn axis_through(&self, p: &Point3) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&a| self.axes.line(a).contains(p, &self.tolerance))
    }
}

fn world_direction(edge: &EdgeRef, transform: &Transform) -> Option<Dir3> {
    Dir3::try_new(transform.apply_vec(&edge.vector()), f64::EPSILON)
}

fn world_normal(face: &FaceRef, transform: &Transform) -> Option<Dir3> {
    transform
        .apply_normal(face.plane.normal.as_ref())
        .and_then(|n| Dir3::try_new(n, f64::EPSILON))
}
