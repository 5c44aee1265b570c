//! Navigation report rendering and persistence.
//!
//! A finished run produces a [`NavigationReport`].  This module renders it
//! as the human-readable results block and saves it through a
//! [`ReportSink`].  Saving is best-effort: a report that cannot be written is
//! logged with `warn!` and the run result is left untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use wallnav_types::{NavError, NavigationReport, TerminationCause};

/// File format of a persisted report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

/// Render the results block shown on the console and written to text files.
pub fn render_text(report: &NavigationReport) -> String {
    let final_state = match report.final_cause {
        TerminationCause::Stuck => "stuck".to_string(),
        cause => format!("finished normally ({cause})"),
    };
    format!(
        "===== NAVIGATION RESULTS =====\n\
         Total time       : {:.2} s\n\
         Approx. distance : {:.2} units\n\
         Collisions       : {}\n\
         Goal reached     : {}\n\
         Final state      : {}\n",
        report.total_time,
        report.distance,
        report.collisions,
        if report.goal_reached { "yes" } else { "no" },
        final_state,
    )
}

/// Render `report` in `format`.
pub fn render(report: &NavigationReport, format: ReportFormat) -> Result<String, NavError> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| NavError::Persistence(format!("failed to serialise report: {e}"))),
    }
}

/// Destination for finished reports.
pub trait ReportSink {
    /// Persist `report`, returning where it was written.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Persistence`] when the report cannot be written.
    fn persist(&self, report: &NavigationReport) -> Result<PathBuf, NavError>;
}

/// Writes each report to `<dir>/navigation_results_<YYYYMMDD_HHMMSS>.<ext>`,
/// stamped with the time the run ended.
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
    format: ReportFormat,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name the report will be written under.
    pub fn file_name(&self, report: &NavigationReport) -> String {
        format!(
            "navigation_results_{}.{}",
            report.finished_at.format("%Y%m%d_%H%M%S"),
            self.format.extension()
        )
    }
}

impl ReportSink for FileReportSink {
    fn persist(&self, report: &NavigationReport) -> Result<PathBuf, NavError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            NavError::Persistence(format!(
                "failed to create report directory {}: {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(self.file_name(report));
        let body = render(report, self.format)?;
        fs::write(&path, body).map_err(|e| {
            NavError::Persistence(format!("failed to write {}: {e}", path.display()))
        })?;
        Ok(path)
    }
}

/// Persist `report`, logging instead of propagating any failure.
pub fn persist_or_warn(sink: &dyn ReportSink, report: &NavigationReport) -> Option<PathBuf> {
    match sink.persist(report) {
        Ok(path) => {
            info!(path = %path.display(), "navigation results saved");
            Some(path)
        }
        Err(e) => {
            warn!(error = %e, "could not save navigation results");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn sample_report(cause: TerminationCause) -> NavigationReport {
        NavigationReport {
            run_id: Uuid::new_v4(),
            started_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 27, 35).unwrap(),
            total_time: 42.4567,
            distance: 12.3456,
            collisions: 3,
            goal_reached: cause == TerminationCause::GoalReached,
            final_cause: cause,
        }
    }

    #[test]
    fn text_report_lists_every_metric() {
        let text = render_text(&sample_report(TerminationCause::GoalReached));
        assert!(text.starts_with("===== NAVIGATION RESULTS ====="));
        assert!(text.contains("Total time       : 42.46 s"));
        assert!(text.contains("Approx. distance : 12.35 units"));
        assert!(text.contains("Collisions       : 3"));
        assert!(text.contains("Goal reached     : yes"));
        assert!(text.contains("Final state      : finished normally (goal_reached)"));
    }

    #[test]
    fn text_report_marks_stuck_runs() {
        let text = render_text(&sample_report(TerminationCause::Stuck));
        assert!(text.contains("Goal reached     : no"));
        assert!(text.contains("Final state      : stuck"));
    }

    #[test]
    fn file_name_uses_end_timestamp() {
        let sink = FileReportSink::new("out", ReportFormat::Json);
        let name = sink.file_name(&sample_report(TerminationCause::ExternalStop));
        assert_eq!(name, "navigation_results_20250314_092735.json");
    }

    #[test]
    fn file_sink_writes_text_report() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sink = FileReportSink::new(dir.path().join("results"), ReportFormat::Text);
        let report = sample_report(TerminationCause::ExternalStop);

        let path = persist_or_warn(&sink, &report).expect("report saved");
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_text(&report));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));
    }

    #[test]
    fn file_sink_writes_json_report() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sink = FileReportSink::new(dir.path(), ReportFormat::Json);
        let report = sample_report(TerminationCause::GoalReached);

        let path = sink.persist(&report).unwrap();
        let back: NavigationReport =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn persistence_failure_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tmp dir");
        // A regular file where the report directory should be.
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "not a directory").unwrap();

        let sink = FileReportSink::new(&blocker, ReportFormat::Text);
        let report = sample_report(TerminationCause::Stuck);
        let before = report.clone();

        assert!(matches!(sink.persist(&report), Err(NavError::Persistence(_))));
        assert!(persist_or_warn(&sink, &report).is_none());
        assert_eq!(report, before);
    }
}
