#![warn(missing_docs)]

//! Interactive scaled tape measure.
//!
//! [`TapeMeasureTool`] is a two-click measuring tool driven by a host
//! application's events. It reads the distance between two picked points,
//! multiplied by a drawing [`Scale`](tape_scale::Scale), and draws the
//! measurement as a double headed arrow. Arrow keys lock the pick to a model
//! axis through the start point; holding Shift locks it to the current
//! inference (see [`InferenceLock`]).
//!
//! Everything the tool needs from the application goes through the [`Host`]
//! trait. [`RecordingHost`] is a headless implementation for replaying
//! sessions and for tests.

pub mod config;
pub mod error;
pub mod host;
pub mod inference_lock;
pub mod overlay;
pub mod recording;
pub mod tool;

pub use config::{KeyBindings, Messages, ToolConfig};
pub use error::{ConfigError, Result};
pub use host::{
    Camera, Color, Cursor, DrawCommand, Host, Key, LineStipple, LineStyle, LockAnchors,
};
pub use inference_lock::{AxisLock, InferenceLock, KeyOutcome, LockTarget, Pointer};
pub use recording::RecordingHost;
pub use tool::{Phase, TapeMeasureTool, CURSOR, ICON_PATH, TOOL_ID};
