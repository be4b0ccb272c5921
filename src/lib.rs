//! calgrid-rs: calendar layout engine.
//!
//! This crate computes the geometry of calendar widgets: which time interval
//! to display, how overlapping events split into visual lanes, how pixel
//! height distributes across rows (including expand/collapse animation), and
//! how pixels map to times and back. It never touches presentation objects;
//! the embedding widget feeds it items and a display geometry and receives
//! rectangles.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ColumnViewConfig, MatrixViewConfig, ViewKind};
pub use core::{DisplayInterval, IntervalQuery, IntervalUnit, RenderItem};
pub use error::{CalendarError, CalendarResult};
