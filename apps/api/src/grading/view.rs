//! On-screen (markdown) rendering of an evaluation.

use crate::grading::feedback::detailed_section;
use crate::layout::document::CODE_ANALYSIS_HEADING;
use crate::layout::{classify, LineClass};
use crate::render::{ReportMeta, REPORT_TITLE};

/// Builds the markdown report shown to the instructor.
///
/// Criterion and section titles become `###` headings and field labels become
/// bold, using the same rule table as the PDF. Blank lines are dropped.
pub fn render_markdown(
    meta: &ReportMeta,
    feedback: &str,
    overall_grade: Option<&str>,
    code_analysis: Option<&str>,
) -> String {
    let mut blocks: Vec<String> = vec![
        format!("# {REPORT_TITLE}"),
        format!("_App version used to grade: {}_", meta.app_version),
        "---".to_string(),
        format!(
            "**Date:** {}  \n**Student Name:** {}  \n**Roll Number:** {}",
            meta.date.format("%Y-%m-%d"),
            meta.student_name,
            meta.student_roll
        ),
        format!("## Overall Grade: {}", overall_grade.unwrap_or("")),
        "---".to_string(),
        "## Detailed Evaluation".to_string(),
    ];

    blocks.extend(
        detailed_section(feedback)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match classify(line) {
                LineClass::Heading => format!("### {line}"),
                LineClass::Label => format!("**{line}**"),
                LineClass::Body => line.to_string(),
            }),
    );

    if let Some(analysis) = code_analysis.map(str::trim).filter(|a| !a.is_empty()) {
        blocks.push("---".to_string());
        blocks.push(format!("## {CODE_ANALYSIS_HEADING}"));
        blocks.extend(
            analysis
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    blocks.join("\n\n")
}
