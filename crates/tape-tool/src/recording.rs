//! A headless [`Host`] that serves scripted picks and records everything the
//! tool tells it.
//!
//! Used to replay recorded sessions and to drive the tool in tests. Engaged
//! inference locks are simulated by snapping scripted pick positions onto
//! the locked line or plane.

use crate::host::{Camera, Cursor, DrawCommand, Host, LockAnchors};
use std::collections::HashMap;
use tape_math::{Axes, BoundingBox, Line, Plane, Point3};
use tape_pick::{DegreesOfFreedom, RawPick};

/// Recording host.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    picks: HashMap<(u64, u64), RawPick>,
    fallback: RawPick,
    axes: Axes,
    bounds: BoundingBox,
    camera: Camera,
    pixel_size: f64,
    lock: LockAnchors,
    lock_calls: usize,
    frame: Vec<DrawCommand>,
    invalidations: usize,
    tooltip: String,
    cursor: Option<Cursor>,
    status_text: String,
    vcb_label: String,
    vcb_value: String,
    messages: Vec<String>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            picks: HashMap::new(),
            fallback: RawPick::invalid(),
            axes: Axes::world(),
            bounds: BoundingBox::empty(),
            camera: Camera::default(),
            pixel_size: 1.0,
            lock: LockAnchors::None,
            lock_calls: 0,
            frame: Vec::new(),
            invalidations: 0,
            tooltip: String::new(),
            cursor: None,
            status_text: String::new(),
            vcb_label: String::new(),
            vcb_value: String::new(),
            messages: Vec::new(),
        }
    }
}

impl RecordingHost {
    /// Host over an empty model with world axes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pick` for the screen position `(x, y)`.
    pub fn place(&mut self, x: f64, y: f64, pick: RawPick) {
        self.picks.insert((x.to_bits(), y.to_bits()), pick);
    }

    /// Serve `pick` for every position without a placed pick.
    pub fn set_pick(&mut self, pick: RawPick) {
        self.fallback = pick;
    }

    /// Set the axis triad.
    pub fn set_axes(&mut self, axes: Axes) {
        self.axes = axes;
    }

    /// Set the model bounds.
    pub fn set_model_bounds(&mut self, bounds: BoundingBox) {
        self.bounds = bounds;
    }

    /// Set the camera.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Set the world size of one pixel.
    pub fn set_pixel_size(&mut self, size: f64) {
        self.pixel_size = size;
    }

    /// Start a new frame, discarding previously drawn geometry.
    pub fn begin_frame(&mut self) {
        self.frame.clear();
    }

    /// Geometry drawn since the last [`begin_frame`](Self::begin_frame).
    pub fn drawn(&self) -> &[DrawCommand] {
        &self.frame
    }

    /// Current inference lock.
    pub fn lock(&self) -> &LockAnchors {
        &self.lock
    }

    /// How many times the lock was set or released.
    pub fn lock_calls(&self) -> usize {
        self.lock_calls
    }

    /// How many redraws were requested.
    pub fn invalidations(&self) -> usize {
        self.invalidations
    }

    /// Current tooltip.
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Last cursor set.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Current status text.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Current value box label.
    pub fn vcb_label(&self) -> &str {
        &self.vcb_label
    }

    /// Current value box contents.
    pub fn vcb_value(&self) -> &str {
        &self.vcb_value
    }

    /// Every message box shown, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    fn apply_lock(&self, mut pick: RawPick) -> RawPick {
        if !pick.valid {
            return pick;
        }
        let snapped = match &self.lock {
            LockAnchors::None => None,
            LockAnchors::Line { start, end } => {
                Line::through(*start, *end).map(|line| line.project(&pick.position))
            }
            LockAnchors::Pick(anchor) => match (anchor.position(), anchor.freedom_constraint()) {
                (Some(origin), Some(dir)) => match anchor.degrees_of_freedom() {
                    DegreesOfFreedom::Line => Line::new(origin, dir.into_inner())
                        .map(|line| line.project(&pick.position)),
                    DegreesOfFreedom::Plane => Plane::new(origin, dir.into_inner())
                        .map(|plane| plane.project(&pick.position)),
                    DegreesOfFreedom::Free => None,
                },
                _ => None,
            },
        };
        if let Some(position) = snapped {
            pick.position = position;
        }
        pick
    }
}

impl Host for RecordingHost {
    fn pick(&mut self, x: f64, y: f64) -> RawPick {
        let pick = self
            .picks
            .get(&(x.to_bits(), y.to_bits()))
            .unwrap_or(&self.fallback)
            .clone();
        self.apply_lock(pick)
    }

    fn axes(&self) -> Axes {
        self.axes
    }

    fn model_bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn lock_inference(&mut self, anchors: LockAnchors) {
        self.lock = anchors;
        self.lock_calls += 1;
    }

    fn inference_locked(&self) -> bool {
        !matches!(self.lock, LockAnchors::None)
    }

    fn camera(&self) -> Camera {
        self.camera
    }

    fn pixels_to_model(&self, pixels: f64, _at: &Point3) -> f64 {
        pixels * self.pixel_size
    }

    fn draw(&mut self, command: DrawCommand) {
        self.frame.push(command);
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }

    fn set_tooltip(&mut self, text: &str) {
        self.tooltip = text.to_string();
    }

    fn set_cursor(&mut self, cursor: &Cursor) {
        self.cursor = Some(*cursor);
    }

    fn set_status_text(&mut self, text: &str) {
        self.status_text = text.to_string();
    }

    fn set_vcb_label(&mut self, text: &str) {
        self.vcb_label = text.to_string();
    }

    fn set_vcb_value(&mut self, text: &str) {
        self.vcb_value = text.to_string();
    }

    fn message_box(&mut self, text: &str) {
        log::warn!("message box: {text}");
        self.messages.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape_math::Vec3;

    #[test]
    fn test_placed_picks_and_fallback() {
        let mut host = RecordingHost::new();
        host.place(1.0, 2.0, RawPick::at(Point3::new(5.0, 0.0, 0.0)));
        assert_eq!(host.pick(1.0, 2.0).position, Point3::new(5.0, 0.0, 0.0));
        assert!(!host.pick(3.0, 4.0).valid);

        host.set_pick(RawPick::at(Point3::new(0.0, 1.0, 0.0)));
        assert!(host.pick(3.0, 4.0).valid);
    }

    #[test]
    fn test_line_lock_snaps_picks() {
        let mut host = RecordingHost::new();
        host.set_pick(RawPick::at(Point3::new(3.0, 4.0, 5.0)));
        host.lock_inference(LockAnchors::Line {
            start: Point3::origin(),
            end: Point3::from(Vec3::x()),
        });
        assert!(host.inference_locked());
        assert_eq!(host.pick(0.0, 0.0).position, Point3::new(3.0, 0.0, 0.0));

        host.lock_inference(LockAnchors::None);
        assert_eq!(host.pick(0.0, 0.0).position, Point3::new(3.0, 4.0, 5.0));
        assert_eq!(host.lock_calls(), 2);
    }
}
