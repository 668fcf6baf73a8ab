//! Output formatting for the CLI.
//!
//! - [`text`] - human-readable output with optional ANSI colors
//! - [`chart`] - fixed-width bar charts over cost series
//! - [`json`] - machine-readable output

pub mod chart;
pub mod json;
pub mod text;

pub use chart::ChartRenderer;
pub use json::JsonFormatter;
pub use text::TextFormatter;
