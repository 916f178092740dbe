//! Tool configuration.
//!
//! Every field has a default, so an empty TOML document is a complete
//! config:
//!
//! ```toml
//! default_scale = "1/4\" = 1'-0\""
//! default_unit = "feet"
//! arrow_head_size = 10.0
//!
//! [length_format]
//! style = "decimal"
//! unit = "millimeters"
//! precision = 0
//!
//! [keys]
//! lock_x = "right"
//! ```

use crate::error::{ConfigError, Result};
use crate::host::Key;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tape_math::Axis;
use tape_scale::{LengthFormat, LengthUnit, Scale};

/// Settings of the tape measure tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Scale in effect before the user types one.
    pub default_scale: String,
    /// Unit bare numbers are read in.
    pub default_unit: LengthUnit,
    /// How measured lengths are displayed.
    pub length_format: LengthFormat,
    /// Arrowhead size in pixels.
    pub arrow_head_size: f64,
    /// Measurement line width in pixels.
    pub line_width: f64,
    /// Measurement line width while an inference lock is engaged.
    pub locked_line_width: f64,
    /// Pick marker size in pixels.
    pub marker_size: f64,
    /// Key bindings.
    pub keys: KeyBindings,
    /// User-facing strings.
    pub messages: Messages,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            default_scale: "1:1".to_string(),
            default_unit: LengthUnit::Inches,
            length_format: LengthFormat::default(),
            arrow_head_size: 8.0,
            line_width: 1.0,
            locked_line_width: 3.0,
            marker_size: 6.0,
            keys: KeyBindings::default(),
            messages: Messages::default(),
        }
    }
}

impl ToolConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ToolConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading tool config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges and that the default scale parses.
    pub fn validate(&self) -> Result<()> {
        self.default_scale()?;

        for (name, value) in [
            ("arrow_head_size", self.arrow_head_size),
            ("line_width", self.line_width),
            ("locked_line_width", self.locked_line_width),
            ("marker_size", self.marker_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if let LengthFormat::Architectural { denominator: 0 } = self.length_format {
            return Err(ConfigError::Invalid(
                "architectural denominator must be at least 1".to_string(),
            ));
        }

        self.keys.validate()
    }

    /// The configured default scale.
    pub fn default_scale(&self) -> Result<Scale> {
        Scale::parse_with_unit(&self.default_scale, self.default_unit).map_err(|source| {
            ConfigError::InvalidScale {
                spec: self.default_scale.clone(),
                source,
            }
        })
    }
}

/// Keys that drive the inference locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Held to lock inference to the current pick.
    pub constrain: Key,
    /// Toggles the X axis lock.
    pub lock_x: Key,
    /// Toggles the Y axis lock.
    pub lock_y: Key,
    /// Toggles the Z axis lock.
    pub lock_z: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            constrain: Key::Shift,
            lock_x: Key::Right,
            lock_y: Key::Left,
            lock_z: Key::Up,
        }
    }
}

impl KeyBindings {
    /// The axis `key` toggles a lock on.
    pub fn axis_for(&self, key: Key) -> Option<Axis> {
        if key == self.lock_x {
            Some(Axis::X)
        } else if key == self.lock_y {
            Some(Axis::Y)
        } else if key == self.lock_z {
            Some(Axis::Z)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<()> {
        let keys = [self.constrain, self.lock_x, self.lock_y, self.lock_z];
        for (i, a) in keys.iter().enumerate() {
            if keys[i + 1..].contains(a) {
                return Err(ConfigError::Invalid(format!("key {a:?} is bound twice")));
            }
        }
        Ok(())
    }
}

/// Strings shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Tool name.
    pub tool_name: String,
    /// Status text while picking the start point.
    pub status_start: String,
    /// Status text while picking the end point.
    pub status_measure: String,
    /// Value box label while picking the start point.
    pub label_start: String,
    /// Value box label while picking the end point.
    pub label_measure: String,
    /// Shown when typed scale text is rejected.
    pub invalid_scale: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            tool_name: "Scaled Tape Measure".to_string(),
            status_start: "Select start point. Type a scale such as 1:50 or 1/4\" = 1'-0\". \
                           Arrow keys lock to an axis, Shift locks the inference."
                .to_string(),
            status_measure: "Select end point. Arrow keys lock to an axis, Shift locks the inference."
                .to_string(),
            label_start: "Scale".to_string(),
            label_measure: "Length".to_string(),
            invalid_scale: "Invalid scale. Enter a ratio such as 1:50 or an equation such as \
                            1/4\" = 1'-0\"."
                .to_string(),
        }
    }
}
