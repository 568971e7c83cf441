//! Output formatting for subnet reports.
//!
//! This module handles turning results into text:
//! - [`render`] - Address and binary rendering
//! - [`report`] - The full subnet report, as text or JSON
//! - [`terminal`] - Label/value line formatting

mod render;
mod report;
mod terminal;

pub use render::{render_address, render_binary, RenderOptions};
pub use report::Report;
pub use terminal::{continuation_indent, format_field, LABEL_WIDTH};
