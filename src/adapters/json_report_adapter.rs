//! JSON report adapter.

use crate::domain::error::EvaluatorError;
use crate::domain::report::EvaluationReport;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(&self, report: &EvaluationReport) -> Result<String, EvaluatorError> {
        serde_json::to_string_pretty(report).map_err(|e| EvaluatorError::Report {
            reason: e.to_string(),
        })
    }
}
