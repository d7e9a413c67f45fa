//! Audit orchestration: concurrent provider calls, run lifecycle, and reports.

pub mod report;
pub mod run;

pub use report::build_report_request;
pub use run::{AnalysisRun, AuditOrchestrator, CreativeUpdate};
