//! Output writers.

/// HTML page writer.
pub mod html;
