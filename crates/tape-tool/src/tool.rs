//! The scaled tape measure tool.

use crate::config::ToolConfig;
use crate::host::{Cursor, DrawCommand, Host, Key, LineStipple, LineStyle};
use crate::inference_lock::{InferenceLock, KeyOutcome, LockTarget};
use crate::overlay;
use std::sync::Arc;
use tape_math::{BoundingBox, Plane, Point3, Tolerance, Vec3};
use tape_pick::{ConstraintResolver, DegreesOfFreedom, PickPoint};
use tape_scale::{Scale, SharedScale};

/// Stable tool identifier.
pub const TOOL_ID: &str = "scaled_tape_measure";

/// Tool icon, relative to the tool's resources.
pub const ICON_PATH: &str = "images/icon.svg";

/// Tool cursor.
pub const CURSOR: Cursor = Cursor {
    path: "images/cursor.svg",
    hotspot_x: 6,
    hotspot_y: 24,
};

/// Which point the next click fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Picking the start point.
    #[default]
    AwaitingStart,
    /// Start fixed, picking the end point.
    AwaitingEnd,
}

/// Measures the distance between two picked points at a drawing scale.
///
/// The first click fixes the start point and the second ends the
/// measurement. When the start point lies on an edge or axis, the end point
/// is projected onto the plane through the start perpendicular to that line,
/// so the reading is the perpendicular distance from the line. The measured
/// length is multiplied by the session's [`SharedScale`], which typing a
/// scale into the value box replaces.
#[derive(Debug)]
pub struct TapeMeasureTool {
    config: ToolConfig,
    scale: SharedScale,
    phase: Phase,
    start: PickPoint,
    end: PickPoint,
    lock: InferenceLock,
    active: bool,
}

struct Picks<'a> {
    phase: Phase,
    start: &'a PickPoint,
    end: &'a PickPoint,
}

impl LockTarget for Picks<'_> {
    fn current_pick(&self) -> &PickPoint {
        match self.phase {
            Phase::AwaitingStart => self.start,
            Phase::AwaitingEnd => self.end,
        }
    }

    fn start_pick(&self) -> &PickPoint {
        self.start
    }
}

impl TapeMeasureTool {
    /// A tool reading and writing `scale`.
    pub fn new(config: ToolConfig, scale: SharedScale) -> Self {
        Self {
            config,
            scale,
            phase: Phase::AwaitingStart,
            start: PickPoint::invalid(),
            end: PickPoint::invalid(),
            lock: InferenceLock::new(),
            active: false,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        TOOL_ID
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.config.messages.tool_name
    }

    /// Icon path.
    pub fn icon_path(&self) -> &'static str {
        ICON_PATH
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The start pick.
    pub fn start_pick(&self) -> &PickPoint {
        &self.start
    }

    /// The end pick.
    pub fn end_pick(&self) -> &PickPoint {
        &self.end
    }

    /// Inference lock state.
    pub fn inference_lock(&self) -> &InferenceLock {
        &self.lock
    }

    /// The scale currently in effect.
    pub fn scale(&self) -> Arc<Scale> {
        self.scale.current()
    }

    /// Configuration.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Whether the tool is the active tool.
    pub fn is_active(&self) -> bool {
        self.active
    }

    // Lifecycle

    /// The tool became the active tool.
    pub fn activate(&mut self, host: &mut dyn Host) {
        log::debug!("{TOOL_ID} activated");
        self.active = true;
        self.phase = Phase::AwaitingStart;
        self.start = PickPoint::invalid();
        self.end = PickPoint::invalid();
        self.lock.release(host);
        self.lock = InferenceLock::new();
        self.update_status_text(host);
    }

    /// Another tool became active.
    pub fn deactivate(&mut self, host: &mut dyn Host) {
        log::debug!("{TOOL_ID} deactivated");
        self.active = false;
        self.reset(host);
        host.invalidate();
    }

    /// A temporary tool such as orbit finished.
    pub fn resume(&mut self, host: &mut dyn Host) {
        host.invalidate();
        self.update_status_text(host);
    }

    /// A temporary tool such as orbit took over.
    pub fn suspend(&mut self, host: &mut dyn Host) {
        host.invalidate();
    }

    /// Escape or an equivalent cancel: abandon the measurement.
    pub fn on_cancel(&mut self, host: &mut dyn Host) {
        self.reset(host);
        host.invalidate();
    }

    // Input

    /// Primary button press.
    pub fn on_lbutton_down(&mut self, host: &mut dyn Host) {
        match self.phase {
            Phase::AwaitingStart => {
                if self.start.is_valid() {
                    log::debug!("start point fixed, measuring");
                    self.phase = Phase::AwaitingEnd;
                }
            }
            Phase::AwaitingEnd => {
                log::debug!("measurement finished: {}", self.readout());
                self.reset(host);
                host.invalidate();
            }
        }
        self.update_status_text(host);
    }

    /// Pointer moved to the screen position `(x, y)`.
    pub fn on_mouse_move(&mut self, x: f64, y: f64, host: &mut dyn Host) {
        self.lock.on_mouse_move(x, y);

        let resolver = ConstraintResolver::new(host.axes());
        let pick = resolver.resolve(&host.pick(x, y));
        match self.phase {
            Phase::AwaitingStart => self.start = pick,
            Phase::AwaitingEnd => {
                self.end = pick;
                host.set_vcb_value(&self.readout());
            }
        }
        host.invalidate();
    }

    /// Key press.
    pub fn on_key_down(&mut self, key: Key, host: &mut dyn Host) {
        let picks = Picks {
            phase: self.phase,
            start: &self.start,
            end: &self.end,
        };
        let outcome = self.lock.on_key_down(key, &self.config.keys, &picks, host);
        self.apply_lock_outcome(outcome, host);
    }

    /// Key release.
    pub fn on_key_up(&mut self, key: Key, host: &mut dyn Host) {
        let outcome = self.lock.on_key_up(key, &self.config.keys, host);
        self.apply_lock_outcome(outcome, host);
    }

    fn apply_lock_outcome(&mut self, outcome: KeyOutcome, host: &mut dyn Host) {
        if let KeyOutcome::Changed { replay } = outcome {
            if let Some(pointer) = replay {
                self.on_mouse_move(pointer.x, pointer.y, host);
            }
            host.invalidate();
        }
    }

    /// Text committed in the value box: a new scale.
    pub fn on_user_text(&mut self, text: &str, host: &mut dyn Host) {
        match Scale::parse_with_unit(text, self.config.default_unit) {
            Ok(scale) => {
                self.scale.replace(scale);
                self.update_status_text(host);
                host.invalidate();
            }
            Err(e) => {
                log::warn!("rejected scale {text:?}: {e}");
                host.message_box(&self.config.messages.invalid_scale);
            }
        }
    }

    /// Whether the value box accepts input. Scales are typed before the
    /// start point is fixed.
    pub fn enable_vcb(&self) -> bool {
        self.phase == Phase::AwaitingStart
    }

    /// Cursor request.
    pub fn on_set_cursor(&self, host: &mut dyn Host) {
        host.set_cursor(&CURSOR);
    }

    /// Region the overlay occupies, for camera framing.
    pub fn extents(&self, host: &dyn Host) -> BoundingBox {
        let mut bounds = host.model_bounds();
        let points = [
            self.start.position(),
            self.end.position(),
            self.measure_end(),
        ];
        for p in points.iter().flatten() {
            bounds.add(p);
        }
        bounds
    }

    // Drawing

    /// Draw the overlay for one frame.
    pub fn draw(&self, host: &mut dyn Host) {
        match self.phase {
            Phase::AwaitingStart => host.set_tooltip(&self.start_tooltip()),
            Phase::AwaitingEnd => {
                host.set_tooltip(&self.readout());
                if let (Some(start), Some(raw_end), Some(end)) =
                    (self.start.position(), self.end.position(), self.measure_end())
                {
                    self.draw_measurement(&start, &raw_end, &end, host);
                }
            }
        }

        for pick in [&self.start, &self.end] {
            if let Some(marker) = overlay::marker(pick, self.config.marker_size) {
                host.draw(marker);
            }
        }
    }

    fn draw_measurement(&self, start: &Point3, raw_end: &Point3, end: &Point3, host: &mut dyn Host) {
        // Nothing to show when the end pick needed no projection.
        if !Tolerance::DEFAULT.points_equal(raw_end, end) {
            host.draw(DrawCommand::Lines {
                points: vec![*raw_end, *end],
                style: LineStyle {
                    stipple: LineStipple::Dashed,
                    width: self.config.line_width,
                    ..LineStyle::default()
                },
            });
        }

        let locked = host.inference_locked() || self.lock.is_engaged();
        let style = LineStyle {
            color: overlay::axis_color(&host.axes(), start, end),
            width: if locked {
                self.config.locked_line_width
            } else {
                self.config.line_width
            },
            stipple: LineStipple::Solid,
        };
        let camera = host.camera();
        let head_pixels = self.config.arrow_head_size;
        let commands = overlay::arrow(
            start,
            end,
            &camera,
            |tip| host.pixels_to_model(head_pixels, tip),
            style,
        );
        for command in commands {
            host.draw(command);
        }
    }

    // Measuring

    /// The end point the measurement is taken to.
    ///
    /// When the start pick is constrained to a line, the end pick projected
    /// onto the plane through the start perpendicular to that line. Otherwise
    /// the end pick itself.
    pub fn measure_end(&self) -> Option<Point3> {
        let end = self.end.position()?;
        if self.start.degrees_of_freedom() == DegreesOfFreedom::Line {
            let plane = self
                .start
                .position()
                .zip(self.start.freedom_constraint())
                .and_then(|(origin, dir)| Plane::new(origin, dir.into_inner()));
            if let Some(plane) = plane {
                return Some(plane.project(&end));
            }
        }
        Some(end)
    }

    /// Unscaled vector from the start to [`measure_end`](Self::measure_end).
    pub fn measure_vector(&self) -> Option<Vec3> {
        Some(self.measure_end()? - self.start.position()?)
    }

    /// The measured length at the current scale.
    pub fn length(&self) -> Option<f64> {
        self.measure_vector()
            .map(|v| self.scale.current().scale_length(v.norm()))
    }

    /// The live readout, e.g. `12' 6" (1:50)`. Empty until the end pick is
    /// valid.
    pub fn readout(&self) -> String {
        match self.length() {
            Some(length) => {
                format!("{} ({})", self.config.length_format.format(length), self.scale.current())
            }
            _ => String::new(),
        }
    }

    /// Scaled size of what a pick hovers: the source edge's length, or the
    /// extents of the instance's definition.
    pub fn hover_info(&self, pick: &PickPoint) -> Option<String> {
        let scale = self.scale.current();
        let format = |len: f64| self.config.length_format.format(scale.scale_length(len));

        if let Some(length) = pick.source_edge_length() {
            return Some(format!("{} ({scale})", format(length)));
        }
        let bounds = pick.instance()?.definition_bounds?;
        Some(format!(
            "{} x {} x {} ({scale})",
            format(bounds.width()),
            format(bounds.depth()),
            format(bounds.height()),
        ))
    }

    fn start_tooltip(&self) -> String {
        match self.hover_info(&self.start) {
            Some(info) => format!("{}\n{info}", self.start.tooltip()),
            None => self.start.tooltip().to_string(),
        }
    }

    fn update_status_text(&self, host: &mut dyn Host) {
        let messages = &self.config.messages;
        match self.phase {
            Phase::AwaitingStart => {
                host.set_status_text(&messages.status_start);
                host.set_vcb_label(&messages.label_start);
                host.set_vcb_value(&self.scale.current().to_string());
            }
            Phase::AwaitingEnd => {
                host.set_status_text(&messages.status_measure);
                host.set_vcb_label(&messages.label_measure);
                host.set_vcb_value(&self.readout());
            }
        }
    }

    fn reset(&mut self, host: &mut dyn Host) {
        if self.phase != Phase::AwaitingStart {
            log::debug!("measurement reset");
        }
        self.start = PickPoint::invalid();
        self.end = PickPoint::invalid();
        self.lock.release(host);
        self.phase = Phase::AwaitingStart;
    }
}
