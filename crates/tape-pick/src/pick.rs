//! Raw host picks and resolved pick points.

use tape_math::{Axis, BoundingBox, Dir3, Line, Plane, Point3, Transform, Vec3};

/// Host identifier of a scene entity.
pub type EntityId = u64;

/// How many directions a pick may still move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreesOfFreedom {
    /// Fully determined: a vertex, or a point in free space.
    #[default]
    Free,
    /// Constrained to a line (an edge or a model axis).
    Line,
    /// Constrained to a plane (a face).
    Plane,
}

impl DegreesOfFreedom {
    /// From a host hint. Anything other than 1 or 2 is treated as free.
    pub fn from_hint(hint: u8) -> Self {
        match hint {
            1 => DegreesOfFreedom::Line,
            2 => DegreesOfFreedom::Plane,
            _ => DegreesOfFreedom::Free,
        }
    }
}

/// An edge under the pointer, in the pick's local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRef {
    /// Host id.
    pub id: EntityId,
    /// Start vertex position.
    pub start: Point3,
    /// End vertex position.
    pub end: Point3,
}

impl EdgeRef {
    /// Edge vector from start to end.
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// The infinite line the edge lies on. `None` for a zero length edge.
    pub fn line(&self) -> Option<Line> {
        Line::through(self.start, self.end)
    }
}

/// A face under the pointer, in the pick's local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRef {
    /// Host id.
    pub id: EntityId,
    /// Plane of the face.
    pub plane: Plane,
}

/// A component or group instance on the pick's instance path.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRef {
    /// Host id.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Bounds of the instance's definition, when it has one.
    pub definition_bounds: Option<BoundingBox>,
}

/// A pick exactly as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPick {
    /// Whether the pointer is over a resolvable position at all.
    pub valid: bool,
    /// World position.
    pub position: Point3,
    /// Host's degrees of freedom hint.
    pub degrees_of_freedom: DegreesOfFreedom,
    /// Edge under the pointer, possibly in the background.
    pub edge: Option<EdgeRef>,
    /// Face under the pointer, possibly in the background.
    pub face: Option<FaceRef>,
    /// Containing instances, outermost first.
    pub instance_path: Vec<InstanceRef>,
    /// Local-to-world transform of the picked entity's container.
    pub transform: Transform,
    /// Host inference tooltip, e.g. "On Edge".
    pub tooltip: String,
}

impl Default for RawPick {
    fn default() -> Self {
        Self {
            valid: false,
            position: Point3::origin(),
            degrees_of_freedom: DegreesOfFreedom::Free,
            edge: None,
            face: None,
            instance_path: Vec::new(),
            transform: Transform::identity(),
            tooltip: String::new(),
        }
    }
}

impl RawPick {
    /// A pick over nothing.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// A valid free pick at `position` with no references.
    pub fn at(position: Point3) -> Self {
        Self {
            valid: true,
            position,
            ..Self::default()
        }
    }
}

/// The entity a pick takes its position from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickSource<'a> {
    /// On an edge.
    Edge(&'a EdgeRef),
    /// On a face.
    Face(&'a FaceRef),
    /// On an instance with no edge or face match.
    Instance(&'a InstanceRef),
    /// Free space, an axis or a guide.
    Nothing,
}

/// A resolved pick. Immutable; re-resolved on every pointer move.
#[derive(Debug, Clone, PartialEq)]
pub struct PickPoint {
    pub(crate) valid: bool,
    pub(crate) position: Point3,
    pub(crate) degrees_of_freedom: DegreesOfFreedom,
    pub(crate) freedom_constraint: Option<Dir3>,
    pub(crate) axis: Option<Axis>,
    pub(crate) source_edge: Option<EdgeRef>,
    pub(crate) source_face: Option<FaceRef>,
    pub(crate) instance: Option<InstanceRef>,
    pub(crate) transform: Transform,
    pub(crate) tooltip: String,
}

impl Default for PickPoint {
    fn default() -> Self {
        Self {
            valid: false,
            position: Point3::origin(),
            degrees_of_freedom: DegreesOfFreedom::Free,
            freedom_constraint: None,
            axis: None,
            source_edge: None,
            source_face: None,
            instance: None,
            transform: Transform::identity(),
            tooltip: String::new(),
        }
    }
}

impl PickPoint {
    /// The cleared pick: invalid, with every derived field absent.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Whether this pick has a position.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// World position, `None` until a successful pick.
    pub fn position(&self) -> Option<Point3> {
        self.valid.then_some(self.position)
    }

    /// Degrees of freedom reported for this pick.
    pub fn degrees_of_freedom(&self) -> DegreesOfFreedom {
        self.degrees_of_freedom
    }

    /// Line direction for a line pick, plane normal for a plane pick.
    ///
    /// Absent for free picks, and for constrained picks whose edge, face or
    /// axis could not be confirmed.
    pub fn freedom_constraint(&self) -> Option<Dir3> {
        self.freedom_constraint
    }

    /// Model axis the pick lies on, when constrained to one.
    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    /// Edge the pick lies on.
    pub fn source_edge(&self) -> Option<&EdgeRef> {
        self.source_edge.as_ref()
    }

    /// Face the pick lies on.
    pub fn source_face(&self) -> Option<&FaceRef> {
        self.source_face.as_ref()
    }

    /// Outermost instance containing the pick.
    pub fn instance(&self) -> Option<&InstanceRef> {
        self.instance.as_ref()
    }

    /// Edge, then face, then instance.
    pub fn source(&self) -> PickSource<'_> {
        if let Some(edge) = &self.source_edge {
            PickSource::Edge(edge)
        } else if let Some(face) = &self.source_face {
            PickSource::Face(face)
        } else if let Some(instance) = &self.instance {
            PickSource::Instance(instance)
        } else {
            PickSource::Nothing
        }
    }

    /// World-space length of the source edge.
    pub fn source_edge_length(&self) -> Option<f64> {
        self.source_edge
            .as_ref()
            .map(|edge| self.transform.apply_vec(&edge.vector()).norm())
    }

    /// Host inference tooltip.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }
}
