use crate::error::{Result, SuccessionError};
use crate::reports::formatters::{JsonFormatter, ReportFormatter, TextFormatter};
use crate::types::{HeirReport, ScoreEntry};

/// Report formats accepted by [`ReportGenerator`]
pub const SUPPORTED_FORMATS: [&str; 2] = ["text", "json"];

/// Report generator for creating various output formats
#[derive(Debug, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a heir report in the specified format
    pub fn generate(&self, report: &HeirReport, format: &str) -> Result<String> {
        self.formatter(format)?.format(report)
    }

    /// Generate a relatedness listing in the specified format
    pub fn generate_scores(&self, scores: &[ScoreEntry], format: &str) -> Result<String> {
        self.formatter(format)?.format_scores(scores)
    }

    fn formatter(&self, format: &str) -> Result<Box<dyn ReportFormatter>> {
        match format.to_lowercase().as_str() {
            "text" => Ok(Box::new(TextFormatter)),
            "json" => Ok(Box::new(JsonFormatter)),
            _ => Err(SuccessionError::UnsupportedFormat(format.to_string())),
        }
    }
}
