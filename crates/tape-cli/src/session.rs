//! Recorded tool sessions and their replay.
//!
//! A session is a JSON document describing the scene the host would report
//! and the events the user produced:
//!
//! ```json
//! {
//!   "events": [
//!     { "type": "activate" },
//!     { "type": "text", "text": "1:50" },
//!     { "type": "move", "x": 10, "y": 10, "pick": { "position": [0, 0, 0] } },
//!     { "type": "click" },
//!     { "type": "move", "x": 90, "y": 10, "pick": { "position": [5, 0, 0] } },
//!     { "type": "draw" }
//!   ]
//! }
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tape_math::{Axes, BoundingBox, Dir3, Plane, Point3, Transform, Vec3};
use tape_pick::{DegreesOfFreedom, EdgeRef, FaceRef, InstanceRef, RawPick};
use tape_scale::SharedScale;
use tape_tool::{
    Camera, Color, DrawCommand, Key, LineStipple, LineStyle, RecordingHost, TapeMeasureTool,
    ToolConfig,
};

type Vec3Dto = [f64; 3];

/// A recorded session.
#[derive(Debug, Deserialize)]
pub struct Session {
    /// Model axis triad. World axes when absent.
    #[serde(default)]
    pub axes: Option<AxesDto>,
    /// Model bounds.
    #[serde(default)]
    pub model_bounds: Option<BoundsDto>,
    /// Camera. A top view when absent.
    #[serde(default)]
    pub camera: Option<CameraDto>,
    /// World size of one pixel.
    #[serde(default = "default_pixel_size")]
    pub pixel_size: f64,
    /// Events in order.
    pub events: Vec<Event>,
}

fn default_pixel_size() -> f64 {
    1.0
}

/// Axis triad.
#[derive(Debug, Deserialize)]
pub struct AxesDto {
    origin: Vec3Dto,
    x: Vec3Dto,
    y: Vec3Dto,
    z: Vec3Dto,
}

/// Axis aligned box.
#[derive(Debug, Deserialize)]
pub struct BoundsDto {
    min: Vec3Dto,
    max: Vec3Dto,
}

/// Camera.
#[derive(Debug, Deserialize)]
pub struct CameraDto {
    eye: Vec3Dto,
    direction: Vec3Dto,
    #[serde(default)]
    perspective: bool,
}

/// A host pick.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PickDto {
    position: Vec3Dto,
    dof: u8,
    edge: Option<EdgeDto>,
    face: Option<FaceDto>,
    instances: Vec<InstanceDto>,
    /// Column-major 4x4 local-to-world matrix.
    transform: Option<[f64; 16]>,
    tooltip: String,
}

/// Edge under a pick.
#[derive(Debug, Deserialize)]
pub struct EdgeDto {
    id: u64,
    start: Vec3Dto,
    end: Vec3Dto,
}

/// Face under a pick.
#[derive(Debug, Deserialize)]
pub struct FaceDto {
    id: u64,
    origin: Vec3Dto,
    normal: Vec3Dto,
}

/// Instance on a pick's path.
#[derive(Debug, Deserialize)]
pub struct InstanceDto {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    bounds: Option<BoundsDto>,
}

/// One user or host event.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Tool activated.
    Activate,
    /// Tool deactivated.
    Deactivate,
    /// Temporary tool took over.
    Suspend,
    /// Temporary tool finished.
    Resume,
    /// Pointer moved. A missing pick is a pick over nothing.
    Move {
        /// Screen x.
        x: f64,
        /// Screen y.
        y: f64,
        /// What the host resolves there.
        #[serde(default)]
        pick: Option<PickDto>,
    },
    /// Primary button press.
    Click,
    /// Key press.
    KeyDown {
        /// The key.
        key: Key,
    },
    /// Key release.
    KeyUp {
        /// The key.
        key: Key,
    },
    /// Text committed in the value box.
    Text {
        /// The text.
        text: String,
    },
    /// Escape.
    Cancel,
    /// Redraw.
    Draw,
    /// Cursor request.
    SetCursor,
    /// Extents query.
    Extents,
}

impl Session {
    /// Parse a session document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a session file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid session {}", path.display()))
    }

    /// Replay the session, returning a transcript of everything the tool
    /// reported to the host.
    pub fn replay(&self, config: &ToolConfig) -> Result<Vec<String>> {
        let scale = SharedScale::new(config.default_scale()?);
        let mut tool = TapeMeasureTool::new(config.clone(), scale);
        let mut host = self.host()?;
        let mut transcript = Transcript::default();

        for (i, event) in self.events.iter().enumerate() {
            log::debug!("event {i}: {event:?}");
            match event {
                Event::Activate => tool.activate(&mut host),
                Event::Deactivate => tool.deactivate(&mut host),
                Event::Suspend => tool.suspend(&mut host),
                Event::Resume => tool.resume(&mut host),
                Event::Move { x, y, pick } => {
                    let raw = match pick {
                        Some(pick) => pick
                            .to_raw()
                            .with_context(|| format!("event {i}: invalid pick"))?,
                        None => RawPick::invalid(),
                    };
                    host.place(*x, *y, raw);
                    tool.on_mouse_move(*x, *y, &mut host);
                }
                Event::Click => tool.on_lbutton_down(&mut host),
                Event::KeyDown { key } => tool.on_key_down(*key, &mut host),
                Event::KeyUp { key } => tool.on_key_up(*key, &mut host),
                Event::Text { text } => tool.on_user_text(text, &mut host),
                Event::Cancel => tool.on_cancel(&mut host),
                Event::Draw => {
                    host.begin_frame();
                    tool.draw(&mut host);
                    transcript.observe(&host);
                    transcript.lines.extend(host.drawn().iter().map(format_command));
                    continue;
                }
                Event::SetCursor => {
                    tool.on_set_cursor(&mut host);
                    if let Some(cursor) = host.cursor() {
                        transcript.lines.push(format!(
                            "cursor: {} ({}, {})",
                            cursor.path, cursor.hotspot_x, cursor.hotspot_y
                        ));
                    }
                }
                Event::Extents => {
                    let bounds = tool.extents(&host);
                    transcript.lines.push(if bounds.is_empty() {
                        "extents: empty".to_string()
                    } else {
                        format!(
                            "extents: {} {}",
                            format_point(&bounds.min),
                            format_point(&bounds.max)
                        )
                    });
                }
            }
            transcript.observe(&host);
        }

        if !tool.readout().is_empty() {
            transcript.lines.push(format!("readout: {}", tool.readout()));
        }
        Ok(transcript.lines)
    }

    fn host(&self) -> Result<RecordingHost> {
        let mut host = RecordingHost::new();
        if let Some(axes) = &self.axes {
            host.set_axes(Axes {
                origin: point(axes.origin),
                x: direction(axes.x).context("zero x axis")?,
                y: direction(axes.y).context("zero y axis")?,
                z: direction(axes.z).context("zero z axis")?,
            });
        }
        if let Some(bounds) = &self.model_bounds {
            host.set_model_bounds(bounds.to_box());
        }
        if let Some(camera) = &self.camera {
            host.set_camera(Camera {
                eye: point(camera.eye),
                direction: vector(camera.direction),
                perspective: camera.perspective,
            });
        }
        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            bail!("pixel_size must be positive, got {}", self.pixel_size);
        }
        host.set_pixel_size(self.pixel_size);
        Ok(host)
    }
}

impl BoundsDto {
    fn to_box(&self) -> BoundingBox {
        BoundingBox::from_points(&[point(self.min), point(self.max)])
    }
}

impl PickDto {
    fn to_raw(&self) -> Result<RawPick> {
        let face = match &self.face {
            Some(face) => Some(FaceRef {
                id: face.id,
                plane: Plane::new(point(face.origin), vector(face.normal))
                    .context("face normal is zero")?,
            }),
            None => None,
        };

        Ok(RawPick {
            valid: true,
            position: point(self.position),
            degrees_of_freedom: DegreesOfFreedom::from_hint(self.dof),
            edge: self.edge.as_ref().map(|edge| EdgeRef {
                id: edge.id,
                start: point(edge.start),
                end: point(edge.end),
            }),
            face,
            instance_path: self
                .instances
                .iter()
                .map(|instance| InstanceRef {
                    id: instance.id,
                    name: instance.name.clone(),
                    definition_bounds: instance.bounds.as_ref().map(BoundsDto::to_box),
                })
                .collect(),
            transform: self
                .transform
                .as_ref()
                .map(Transform::from_column_slice)
                .unwrap_or_default(),
            tooltip: self.tooltip.clone(),
        })
    }
}

/// Collects host output, recording only what changed.
#[derive(Default)]
struct Transcript {
    lines: Vec<String>,
    status: String,
    label: String,
    value: String,
    tooltip: String,
    messages: usize,
}

impl Transcript {
    fn observe(&mut self, host: &RecordingHost) {
        if host.status_text() != self.status {
            self.status = host.status_text().to_string();
            self.lines.push(format!("status: {}", self.status));
        }
        if host.vcb_label() != self.label || host.vcb_value() != self.value {
            self.label = host.vcb_label().to_string();
            self.value = host.vcb_value().to_string();
            self.lines.push(format!("vcb: {} = {}", self.label, self.value));
        }
        if host.tooltip() != self.tooltip {
            self.tooltip = host.tooltip().to_string();
            self.lines
                .push(format!("tooltip: {}", self.tooltip.replace('\n', " | ")));
        }
        for message in &host.messages()[self.messages..] {
            self.lines.push(format!("message: {message}"));
        }
        self.messages = host.messages().len();
    }
}

fn point(v: Vec3Dto) -> Point3 {
    Point3::new(v[0], v[1], v[2])
}

fn vector(v: Vec3Dto) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

fn direction(v: Vec3Dto) -> Option<Dir3> {
    Dir3::try_new(vector(v), f64::EPSILON)
}

fn format_point(p: &Point3) -> String {
    format!("({:.3}, {:.3}, {:.3})", p.x, p.y, p.z)
}

fn format_color(c: &Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn format_style(style: &LineStyle) -> String {
    let stipple = match style.stipple {
        LineStipple::Solid => "solid",
        LineStipple::Dashed => "dashed",
        LineStipple::Dotted => "dotted",
    };
    format!("{} {} {stipple}", format_color(&style.color), style.width)
}

fn format_points(points: &[Point3]) -> String {
    points.iter().map(format_point).collect::<Vec<_>>().join(" ")
}

fn format_command(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Lines { points, style } => {
            format!("draw lines [{}] {}", format_style(style), format_points(points))
        }
        DrawCommand::LineStrip { points, style } => {
            format!("draw strip [{}] {}", format_style(style), format_points(points))
        }
        DrawCommand::Marker {
            position,
            size,
            color,
        } => format!(
            "draw marker [{} {size}] {}",
            format_color(color),
            format_point(position)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = include_str!("../sessions/basic.json");

    fn decimal_inches() -> ToolConfig {
        ToolConfig::from_toml_str(
            "[length_format]\nstyle = \"decimal\"\nunit = \"inches\"\nprecision = 0\n",
        )
        .unwrap()
    }

    #[test]
    fn test_replay_basic_session() {
        let session = Session::from_json(BASIC).unwrap();
        let lines = session.replay(&decimal_inches()).unwrap();

        assert!(lines.iter().any(|l| l == "vcb: Scale = 1:1"));
        assert!(lines.iter().any(|l| l == "vcb: Scale = 1:50"));
        assert!(lines.iter().any(|l| l == "tooltip: 250\" (1:50)"));
        assert!(lines.iter().any(|l| l.starts_with("draw lines [#ff0000 1 solid]")));
        assert_eq!(lines.last().map(String::as_str), Some("readout: 250\" (1:50)"));
    }

    #[test]
    fn test_replay_reports_rejected_scale() {
        let session = Session::from_json(
            r#"{ "events": [
                { "type": "activate" },
                { "type": "text", "text": "1:0" }
            ] }"#,
        )
        .unwrap();
        let lines = session.replay(&ToolConfig::default()).unwrap();
        assert!(lines.iter().any(|l| l.starts_with("message: Invalid scale")));
    }

    #[test]
    fn test_replay_axis_lock_and_cursor() {
        let session = Session::from_json(
            r#"{ "events": [
                { "type": "activate" },
                { "type": "set_cursor" },
                { "type": "move", "x": 0, "y": 0, "pick": { "position": [1, 1, 0] } },
                { "type": "click" },
                { "type": "move", "x": 5, "y": 5, "pick": { "position": [4, 5, 0] } },
                { "type": "key_down", "key": "right" },
                { "type": "extents" }
            ] }"#,
        )
        .unwrap();
        let lines = session.replay(&decimal_inches()).unwrap();
        assert!(lines.contains(&"cursor: images/cursor.svg (6, 24)".to_string()));
        assert!(lines.contains(&"extents: (1.000, 1.000, 0.000) (4.000, 1.000, 0.000)".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("readout: 3\" (1:1)"));
    }

    #[test]
    fn test_rejects_degenerate_face() {
        let session = Session::from_json(
            r#"{ "events": [
                { "type": "activate" },
                { "type": "move", "x": 0, "y": 0,
                  "pick": { "position": [0, 0, 0], "dof": 2,
                            "face": { "id": 1, "origin": [0, 0, 0], "normal": [0, 0, 0] } } }
            ] }"#,
        )
        .unwrap();
        assert!(session.replay(&ToolConfig::default()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::load(&dir.path().join("nope.json")).is_err());
    }
}
