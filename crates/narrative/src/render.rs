use std::fmt::Write;

use crate::{NarrativeReport, SectionKind};

const REPORT_HEADER: &str = "STOCK ANALYSIS REPORT";

impl NarrativeReport {
    /// Markdown with bold section headings, one paragraph per section
    pub fn to_markdown(&self) -> String {
        let mut out = format!("📊 **{REPORT_HEADER}**\n\n");

        for section in &self.sections {
            match section.kind {
                SectionKind::Recommendation => {
                    let _ = write!(
                        out,
                        "**{}:**\n{} **{}:** {}\n\n",
                        section.kind.title(),
                        section.tone.marker(),
                        self.recommendation.label(),
                        section.text
                    );
                }
                SectionKind::Disclaimer => {
                    let _ = writeln!(
                        out,
                        "{} **{}:** {}",
                        section.tone.marker(),
                        section.kind.title(),
                        section.text
                    );
                }
                _ => {
                    let _ = write!(
                        out,
                        "**{}:**\n{} {}\n\n",
                        section.kind.title(),
                        section.tone.marker(),
                        section.text
                    );
                }
            }
        }

        out
    }

    /// Terminal-friendly rendering without Markdown emphasis
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{REPORT_HEADER}\n{}\n", "=".repeat(REPORT_HEADER.len()));

        for section in &self.sections {
            let _ = write!(out, "\n{}\n", section.kind.title());
            match section.kind {
                SectionKind::Recommendation => {
                    let _ = writeln!(
                        out,
                        "{} {} (score {}): {}",
                        section.tone.marker(),
                        self.recommendation.label(),
                        self.score,
                        section.text
                    );
                }
                _ => {
                    let _ = writeln!(out, "{} {}", section.tone.marker(), section.text);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use crate::generate_narrative;
    use analysis_core::{SupplementalInput, ValuationInput};
    use fundamental_analysis::compute_valuation;

    #[test]
    fn test_markdown_contains_headings_in_order() {
        let input = ValuationInput::new(5.50, 25.00, 10.0, 30.00);
        let result = compute_valuation(&input).unwrap();
        let report = generate_narrative(&input, &result, &SupplementalInput::default());
        let markdown = report.to_markdown();

        let valuation = markdown.find("**VALUATION:**").unwrap();
        let growth = markdown.find("**GROWTH:**").unwrap();
        let recommendation = markdown.find("**FINAL RECOMMENDATION:**").unwrap();
        let disclaimer = markdown.find("**DISCLAIMER:**").unwrap();
        assert!(valuation < growth);
        assert!(growth < recommendation);
        assert!(recommendation < disclaimer);
        assert!(!markdown.contains("**DIVIDENDS:**"));
    }

    #[test]
    fn test_plain_text_includes_score() {
        let input = ValuationInput::new(5.50, 25.00, 10.0, 30.00);
        let result = compute_valuation(&input).unwrap();
        let report = generate_narrative(&input, &result, &SupplementalInput::default());
        let text = report.to_plain_text();

        assert!(text.starts_with("STOCK ANALYSIS REPORT"));
        assert!(text.contains(&format!("(score {})", report.score)));
        assert!(!text.contains("**"));
    }
}
