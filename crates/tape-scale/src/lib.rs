#![warn(missing_docs)]

//! Drawing scales and the length grammar they are written in.
//!
//! A [`Scale`] is entered either as a ratio (`1:50`) or as an
//! architectural/engineering equation between two lengths
//! (`1/4" = 1'-0"`). Either way it reduces to a unitless factor that
//! multiplies model lengths into the lengths the user reads, and it is
//! always displayed as `1:N`.
//!
//! # Example
//!
//! ```
//! use tape_scale::{LengthFormat, Scale};
//!
//! let scale: Scale = "1/4\" = 1'-0\"".parse().unwrap();
//! assert_eq!(scale.to_string(), "1:48");
//!
//! let read = scale.scale_length(3.0);
//! assert_eq!(LengthFormat::default().format(read), "12' 0\"");
//! ```

pub mod error;
pub mod scale;
pub mod units;

pub use error::{Result, ScaleError};
pub use scale::{Scale, SharedScale};
pub use units::{parse_length, LengthFormat, LengthUnit};
