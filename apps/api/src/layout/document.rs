//! The line sequence a report is laid out from.

/// Heading inserted ahead of the ungraded code analysis.
pub const CODE_ANALYSIS_HEADING: &str = "Detailed Code Analysis (Ungraded)";

/// Ordered raw text lines. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Splits `text` on line terminators (`\n` or `\r\n`).
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// Feedback followed, when present, by the code analysis under its own heading.
    pub fn for_report(feedback: &str, code_analysis: Option<&str>) -> Self {
        match code_analysis.map(str::trim).filter(|a| !a.is_empty()) {
            Some(analysis) => Self::from_text(&format!(
                "{feedback}\n\n{CODE_ANALYSIS_HEADING}\n{analysis}"
            )),
            None => Self::from_text(feedback),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_crlf_and_lf() {
        let doc = Document::from_text("a\r\nb\nc");
        assert_eq!(doc.lines(), ["a", "b", "c"]);
    }

    #[test]
    fn test_for_report_without_analysis_is_feedback_only() {
        let doc = Document::for_report("OVERALL_GRADE: 8\n1. Correctness", None);
        assert_eq!(doc.lines().len(), 2);
        let blank = Document::for_report("x", Some("   "));
        assert_eq!(blank.lines(), ["x"]);
    }

    #[test]
    fn test_for_report_appends_analysis_heading() {
        let doc = Document::for_report("feedback", Some("Structure: fine"));
        assert_eq!(
            doc.lines(),
            ["feedback", "", CODE_ANALYSIS_HEADING, "Structure: fine"]
        );
    }
}
