//! Logging facilities for Mosaic.
//!
//! Mosaic uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so output can be
//! filtered per subsystem with ordinary `tracing` directives, e.g.
//! `RUST_LOG=mosaic::layout=debug`.

/// Span names used throughout Mosaic for tracing.
pub mod span_names {
    /// A full layout pass (segmentation followed by equalization).
    pub const LAYOUT_PASS: &str = "mosaic::layout_pass";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "mosaic_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "mosaic_core::signal";
    /// Row segmentation and height equalization.
    pub const LAYOUT: &str = "mosaic::layout";
    /// Filter state changes and visibility computation.
    pub const FILTER: &str = "mosaic::filter";
    /// Sort option changes and ordering.
    pub const SORT: &str = "mosaic::sort";
    /// Grid lifecycle events.
    pub const EVENTS: &str = "mosaic::events";
    /// Perf spans.
    pub const PERF: &str = "mosaic::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for timing an operation with a subscriber that records span
/// durations.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            _span: span.entered(),
        }
    }
}
