use crate::error::Result;
use crate::types::{HeirReport, ScoreEntry};

/// Trait for report formatters
pub trait ReportFormatter {
    fn format(&self, report: &HeirReport) -> Result<String>;

    fn format_scores(&self, scores: &[ScoreEntry]) -> Result<String>;
}

/// Plain text formatter: the heir's name on a single line
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &HeirReport) -> Result<String> {
        Ok(report.heir.clone())
    }

    fn format_scores(&self, scores: &[ScoreEntry]) -> Result<String> {
        let lines: Vec<String> = scores
            .iter()
            .map(|entry| {
                format!(
                    "{}\t{}{}",
                    entry.name,
                    entry.relatedness,
                    if entry.claimant { "\tclaimant" } else { "" }
                )
            })
            .collect();
        Ok(lines.join("\n"))
    }
}

/// JSON formatter
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &HeirReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_scores(&self, scores: &[ScoreEntry]) -> Result<String> {
        Ok(serde_json::to_string_pretty(scores)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PropagationPolicy, NO_HEIR};

    fn sample_report(heir: &str, relatedness: f64) -> HeirReport {
        HeirReport {
            heir: heir.to_string(),
            relatedness,
            founder: Some("F".to_string()),
            policy: PropagationPolicy::BreadthFirst,
            claimants: 2,
            claimants_in_pedigree: 1,
        }
    }

    #[test]
    fn test_text_is_single_line() {
        let text = TextFormatter.format(&sample_report("C", 0.5)).unwrap();
        assert_eq!(text, "C");

        let text = TextFormatter.format(&sample_report(NO_HEIR, 0.0)).unwrap();
        assert_eq!(text, "no heir found");
    }

    #[test]
    fn test_json_fields() {
        let json = JsonFormatter.format(&sample_report("C", 0.75)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["heir"], "C");
        assert_eq!(value["relatedness"], 0.75);
        assert_eq!(value["founder"], "F");
        assert_eq!(value["policy"], "breadth_first");
        assert_eq!(value["claimants_in_pedigree"], 1);
    }

    #[test]
    fn test_text_scores() {
        let scores = vec![
            ScoreEntry { name: "F".to_string(), relatedness: 1.0, claimant: false },
            ScoreEntry { name: "C".to_string(), relatedness: 0.75, claimant: true },
        ];
        let text = TextFormatter.format_scores(&scores).unwrap();
        assert_eq!(text, "F\t1\nC\t0.75\tclaimant");
    }
}
