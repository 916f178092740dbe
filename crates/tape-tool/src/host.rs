//! The seam between the tool and the modeling application hosting it.
//!
//! The tool never talks to a scene, a viewport or a status bar directly.
//! Everything it needs from the outside goes through [`Host`], so the same
//! state machine runs inside an application, in a replayed session or in a
//! test double.

use serde::{Deserialize, Serialize};
use tape_math::{Axes, BoundingBox, Point3, Vec3};
use tape_pick::{PickPoint, RawPick};

/// A key as delivered to the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Shift.
    Shift,
    /// Control.
    Control,
    /// Alt / Option.
    Alt,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Escape.
    Escape,
    /// Enter / Return.
    Enter,
    /// Any other key, by host key code.
    Other(u32),
}

/// The viewport camera, as far as overlay drawing needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub eye: Point3,
    /// View direction.
    pub direction: Vec3,
    /// Perspective or parallel projection.
    pub perspective: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 0.0, 100.0),
            direction: -Vec3::z(),
            perspective: false,
        }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Red, the X axis color.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Green, the Y axis color.
    pub const GREEN: Color = Color::rgb(0, 160, 0);
    /// Blue, the Z axis color.
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Magenta, used for edge picks.
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    /// Color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Dash pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStipple {
    /// Continuous.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
}

/// Per-call styling of line geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Line color.
    pub color: Color,
    /// Width in pixels.
    pub width: f64,
    /// Dash pattern.
    pub stipple: LineStipple,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            stipple: LineStipple::Solid,
        }
    }
}

/// Overlay geometry in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Independent segments, one per pair of points.
    Lines {
        /// Segment endpoints, two per segment.
        points: Vec<Point3>,
        /// Styling.
        style: LineStyle,
    },
    /// A connected polyline.
    LineStrip {
        /// Vertices in order.
        points: Vec<Point3>,
        /// Styling.
        style: LineStyle,
    },
    /// A pick marker.
    Marker {
        /// Marker center.
        position: Point3,
        /// Size in pixels.
        size: f64,
        /// Marker color.
        color: Color,
    },
}

/// What to lock the host's inference to.
#[derive(Debug, Clone, PartialEq)]
pub enum LockAnchors {
    /// Release any lock.
    None,
    /// Lock to whatever the pick is constrained to.
    Pick(PickPoint),
    /// Lock to the infinite line through two points.
    Line {
        /// First point.
        start: Point3,
        /// Second point.
        end: Point3,
    },
}

/// A cursor image and its hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Image path, relative to the tool's resources.
    pub path: &'static str,
    /// Hotspot x in pixels from the left.
    pub hotspot_x: i32,
    /// Hotspot y in pixels from the top.
    pub hotspot_y: i32,
}

/// Services the host application provides to the tool.
pub trait Host {
    /// Resolve the scene under a screen position.
    fn pick(&mut self, x: f64, y: f64) -> RawPick;

    /// The model axis triad.
    fn axes(&self) -> Axes;

    /// Bounds of everything in the model.
    fn model_bounds(&self) -> BoundingBox;

    /// Lock or release the host's inference.
    fn lock_inference(&mut self, anchors: LockAnchors);

    /// Whether any inference lock is engaged.
    fn inference_locked(&self) -> bool;

    /// The current camera.
    fn camera(&self) -> Camera;

    /// World length covering `pixels` on screen at `at`.
    fn pixels_to_model(&self, pixels: f64, at: &Point3) -> f64;

    /// Emit overlay geometry. Only meaningful while drawing.
    fn draw(&mut self, command: DrawCommand);

    /// Request a redraw.
    fn invalidate(&mut self);

    /// Set the tooltip shown next to the pointer.
    fn set_tooltip(&mut self, text: &str);

    /// Set the pointer cursor.
    fn set_cursor(&mut self, cursor: &Cursor);

    /// Set the status bar instruction text.
    fn set_status_text(&mut self, text: &str);

    /// Set the label of the value box.
    fn set_vcb_label(&mut self, text: &str);

    /// Set the contents of the value box.
    fn set_vcb_value(&mut self, text: &str);

    /// Show a modal message.
    fn message_box(&mut self, text: &str);
}
