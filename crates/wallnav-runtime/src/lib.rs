//! `wallnav-runtime` – Run Loop and Reporting
//!
//! Wires the navigation core to a device and decides when a run is over.
//!
//! # Modules
//!
//! - [`run_loop`] – [`RunLoop`][run_loop::RunLoop]: the tick-synchronous
//!   sense–decide–act–measure cycle, the committed collision reverse, and the
//!   termination policy (external stop, goal reached, stuck).
//! - [`report`] – [`render_text`][report::render_text] and
//!   [`FileReportSink`][report::FileReportSink]: the final results block and
//!   its best-effort persistence to timestamped files.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: the global
//!   `tracing` subscriber with optional OTLP span export.

pub mod report;
pub mod run_loop;
pub mod telemetry;

pub use report::{FileReportSink, ReportFormat, ReportSink, persist_or_warn, render_text};
pub use run_loop::{RunLoop, RunLoopConfig};
pub use telemetry::{TracerProviderGuard, init_tracing};
