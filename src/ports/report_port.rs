//! Report output port trait.

use crate::domain::error::EvaluatorError;
use crate::domain::report::EvaluationReport;

/// Port for writing evaluation reports. An `output_path` of `-` means stdout.
pub trait ReportPort {
    fn render(&self, report: &EvaluationReport) -> Result<String, EvaluatorError>;

    fn write(&self, report: &EvaluationReport, output_path: &str) -> Result<(), EvaluatorError> {
        let content = self.render(report)?;
        if output_path == "-" {
            println!("{content}");
            Ok(())
        } else {
            std::fs::write(output_path, content).map_err(EvaluatorError::from)
        }
    }
}
