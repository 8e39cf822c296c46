//! Parsing of the semi-structured evaluation text returned by the model.
//!
//! Everything here is total: a reply that is missing markers produces empty
//! fields, never an error.

use serde::{Deserialize, Serialize};

const OVERALL_GRADE_MARKER: &str = "OVERALL_GRADE:";
const DETAIL_MARKER: &str = "1. Correctness";
const SUMMARY_MARKER: &str = "Summary of Key Recommendations:";
const COMMENTS_MARKER: &str = "Additional Comments:";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// One numbered criterion of the evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriterionFeedback {
    /// Criterion name without number or score range, e.g. "Code Quality".
    pub title: String,
    /// Upper bound from a "(0-N)" suffix, when present.
    pub max_score: Option<u32>,
    pub score: Option<String>,
    pub reasoning: String,
    pub areas_for_improvement: String,
    pub key_strengths: String,
}

impl CriterionFeedback {
    /// Leading numeric part of `score` ("4", "4/5", "4 out of 5" → 4.0).
    pub fn score_value(&self) -> Option<f64> {
        let score = self.score.as_deref()?.trim();
        let end = score
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(score.len());
        score[..end].trim_end_matches('.').parse().ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub overall_grade: Option<String>,
    pub criteria: Vec<CriterionFeedback>,
    pub recommendations: Vec<String>,
    pub additional_comments: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Marker extraction
// ────────────────────────────────────────────────────────────────────────────

/// Text after the first `OVERALL_GRADE:` up to the end of that line.
pub fn overall_grade(feedback: &str) -> Option<String> {
    let (_, rest) = feedback.split_once(OVERALL_GRADE_MARKER)?;
    let grade = rest
        .lines()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| c == '*' || c.is_whitespace());
    (!grade.is_empty()).then(|| grade.to_string())
}

/// The feedback from the first criterion onward; empty when the marker is absent.
pub fn detailed_section(feedback: &str) -> &str {
    feedback
        .find(DETAIL_MARKER)
        .map(|idx| &feedback[idx..])
        .unwrap_or("")
}

// ────────────────────────────────────────────────────────────────────────────
// Structured parse
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Score,
    Reasoning,
    Improvement,
    Strengths,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Criterion(Option<Field>),
    Recommendations,
    Comments,
}

const FIELD_LABELS: &[(&str, Field)] = &[
    ("Score:", Field::Score),
    ("Reasoning:", Field::Reasoning),
    ("Areas for Improvement:", Field::Improvement),
    ("Key Strengths:", Field::Strengths),
];

/// Parses the full evaluation layout into structured fields.
pub fn parse_evaluation(feedback: &str) -> Evaluation {
    let mut evaluation = Evaluation {
        overall_grade: overall_grade(feedback),
        ..Evaluation::default()
    };
    let mut section = Section::Preamble;

    for raw in feedback.lines() {
        let line = normalize(raw);
        if line.is_empty() || line.starts_with(OVERALL_GRADE_MARKER) {
            continue;
        }

        if let Some(rest) = after_marker(&line, SUMMARY_MARKER) {
            section = Section::Recommendations;
            if !rest.is_empty() {
                evaluation.recommendations.push(strip_list_prefix(rest).to_string());
            }
            continue;
        }
        if let Some(rest) = after_marker(&line, COMMENTS_MARKER) {
            section = Section::Comments;
            append(&mut evaluation.additional_comments, rest);
            continue;
        }

        match section {
            Section::Recommendations => {
                evaluation.recommendations.push(strip_list_prefix(&line).to_string());
            }
            Section::Comments => append(&mut evaluation.additional_comments, &line),
            Section::Preamble | Section::Criterion(_) => {
                if let Some(criterion) = parse_criterion_heading(&line, evaluation.criteria.len() + 1)
                {
                    evaluation.criteria.push(criterion);
                    section = Section::Criterion(None);
                    continue;
                }
                let Some(current) = evaluation.criteria.last_mut() else {
                    continue;
                };
                if let Some((field, rest)) = field_label(&line) {
                    section = Section::Criterion(Some(field));
                    set_field(current, field, rest);
                } else if let Section::Criterion(Some(field)) = section {
                    set_field(current, field, &line);
                }
            }
        }
    }

    evaluation
}

/// Trims and drops markdown emphasis and bullet markers.
fn normalize(line: &str) -> String {
    line.replace("**", "")
        .trim()
        .trim_start_matches(|c: char| {
            c == '-' || c == '•' || c == '*' || c == '#' || c.is_whitespace()
        })
        .to_string()
}

/// Text after `marker` when the line opens with it; mentions mid-line do not count.
fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker).map(str::trim)
}

/// Removes a leading "N." / "N)" list number.
fn strip_list_prefix(item: &str) -> &str {
    let digits = item.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return item;
    }
    match item[digits..].strip_prefix(['.', ')']) {
        Some(rest) => rest.trim_start(),
        None => item,
    }
}

/// Recognises "N. Title (0-M):" where N is the expected next criterion number.
fn parse_criterion_heading(line: &str, expected: usize) -> Option<CriterionFeedback> {
    let (number, rest) = line.split_once('.')?;
    if number.trim().parse::<usize>().ok()? != expected {
        return None;
    }
    let rest = rest.trim().trim_end_matches(':').trim();
    if rest.is_empty() {
        return None;
    }

    let (title, max_score) = match rest.rfind('(') {
        Some(open) if rest.ends_with(')') => {
            let range = &rest[open + 1..rest.len() - 1];
            let max = range
                .split_once('-')
                .and_then(|(_, hi)| hi.trim().parse::<u32>().ok());
            (rest[..open].trim(), max)
        }
        _ => (rest, None),
    };

    Some(CriterionFeedback {
        title: title.to_string(),
        max_score,
        ..CriterionFeedback::default()
    })
}

fn field_label(line: &str) -> Option<(Field, &str)> {
    FIELD_LABELS
        .iter()
        .find_map(|(label, field)| line.strip_prefix(label).map(|rest| (*field, rest.trim())))
}

fn set_field(criterion: &mut CriterionFeedback, field: Field, text: &str) {
    match field {
        Field::Score => {
            if criterion.score.is_none() && !text.is_empty() {
                criterion.score = Some(text.to_string());
            }
        }
        Field::Reasoning => append(&mut criterion.reasoning, text),
        Field::Improvement => append(&mut criterion.areas_for_improvement, text),
        Field::Strengths => append(&mut criterion.key_strengths, text),
    }
}

fn append(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEEDBACK: &str = "\
OVERALL_GRADE: 8

1. Correctness (0-5):
Score: 4
Reasoning: All tasks run, but the outlier filter uses the wrong threshold.
Areas for Improvement: Check the threshold against the assignment.
Key Strengths: Clean pandas usage.

2. Adherence to Instructions (0-5):
Score: 5
Reasoning: Every step requested is present.
Areas for Improvement: None.
Key Strengths: Follows the order of the template.

3. Code Quality (0-5):
Score: 3/5
Reasoning: Functions are long.
The plotting cell repeats code.
Areas for Improvement:
- Extract helpers
- Name variables clearly
Key Strengths: Comments are present.

4. Explanation Quality (0-5):
Score: 4
Reasoning: Markdown cells explain results.
Areas for Improvement: Discuss limitations.
Key Strengths: Clear conclusions.

Summary of Key Recommendations:
1. Fix the outlier threshold.
2. Split long functions.
3. Discuss limitations.

Additional Comments: Good work overall.
Keep it up.";

    #[test]
    fn test_overall_grade_extracted() {
        assert_eq!(overall_grade(FEEDBACK), Some("8".to_string()));
        assert_eq!(overall_grade("OVERALL_GRADE:   7/10  \n1."), Some("7/10".to_string()));
    }

    #[test]
    fn test_overall_grade_missing_marker() {
        assert_eq!(overall_grade("no grade here"), None);
        assert_eq!(overall_grade("OVERALL_GRADE:\n"), None);
    }

    #[test]
    fn test_detailed_section_starts_at_first_criterion() {
        let detail = detailed_section(FEEDBACK);
        assert!(detail.starts_with("1. Correctness (0-5):"));
        assert!(!detail.contains("OVERALL_GRADE"));
    }

    #[test]
    fn test_detailed_section_missing_marker_is_empty() {
        assert_eq!(detailed_section("Error with the API"), "");
    }

    #[test]
    fn test_parse_full_evaluation() {
        let evaluation = parse_evaluation(FEEDBACK);
        assert_eq!(evaluation.overall_grade.as_deref(), Some("8"));
        assert_eq!(evaluation.criteria.len(), 4);

        let titles: Vec<&str> = evaluation.criteria.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Correctness",
                "Adherence to Instructions",
                "Code Quality",
                "Explanation Quality"
            ]
        );
        assert!(evaluation.criteria.iter().all(|c| c.max_score == Some(5)));

        let correctness = &evaluation.criteria[0];
        assert_eq!(correctness.score.as_deref(), Some("4"));
        assert_eq!(correctness.key_strengths, "Clean pandas usage.");

        assert_eq!(
            evaluation.recommendations,
            vec![
                "Fix the outlier threshold.",
                "Split long functions.",
                "Discuss limitations."
            ]
        );
        assert_eq!(evaluation.additional_comments, "Good work overall.\nKeep it up.");
    }

    #[test]
    fn test_multiline_fields_are_joined() {
        let evaluation = parse_evaluation(FEEDBACK);
        let quality = &evaluation.criteria[2];
        assert_eq!(
            quality.reasoning,
            "Functions are long.\nThe plotting cell repeats code."
        );
        assert_eq!(
            quality.areas_for_improvement,
            "Extract helpers\nName variables clearly"
        );
        assert_eq!(quality.score_value(), Some(3.0));
    }

    #[test]
    fn test_markdown_emphasis_is_tolerated() {
        let evaluation = parse_evaluation(
            "**OVERALL_GRADE:** 6\n**1. Correctness (0-5):**\n- **Score:** 3\n- **Reasoning:** ok",
        );
        assert_eq!(evaluation.overall_grade.as_deref(), Some("6"));
        assert_eq!(evaluation.criteria.len(), 1);
        assert_eq!(evaluation.criteria[0].score.as_deref(), Some("3"));
        assert_eq!(evaluation.criteria[0].reasoning, "ok");
    }

    #[test]
    fn test_numbered_point_inside_reasoning_is_not_a_criterion() {
        let evaluation = parse_evaluation(
            "1. Correctness (0-5):\nReasoning: two issues\n1. first issue\n2. Adherence (0-5):\nScore: 5",
        );
        // "1. first issue" is not the expected criterion number 2.
        assert_eq!(evaluation.criteria.len(), 2);
        assert_eq!(
            evaluation.criteria[0].reasoning,
            "two issues\n1. first issue"
        );
        assert_eq!(evaluation.criteria[1].title, "Adherence");
    }

    #[test]
    fn test_section_markers_mid_line_stay_in_criterion() {
        let evaluation = parse_evaluation(
            "1. Correctness (0-5):\n\
             Reasoning: see Additional Comments: below\n\
             Areas for Improvement: follow the Summary of Key Recommendations: list\n\
             ### Additional Comments:\n\
             Solid effort.",
        );
        let correctness = &evaluation.criteria[0];
        assert_eq!(correctness.reasoning, "see Additional Comments: below");
        assert_eq!(
            correctness.areas_for_improvement,
            "follow the Summary of Key Recommendations: list"
        );
        assert!(evaluation.recommendations.is_empty());
        assert_eq!(evaluation.additional_comments, "Solid effort.");
    }

    #[test]
    fn test_unstructured_reply_yields_empty_evaluation() {
        let evaluation = parse_evaluation("Error with OpenAI API: timeout");
        assert_eq!(evaluation, Evaluation::default());
    }

    #[test]
    fn test_score_value_variants() {
        let with = |s: &str| CriterionFeedback {
            score: Some(s.to_string()),
            ..CriterionFeedback::default()
        };
        assert_eq!(with("4").score_value(), Some(4.0));
        assert_eq!(with("4.5 out of 5").score_value(), Some(4.5));
        assert_eq!(with("n/a").score_value(), None);
        assert_eq!(CriterionFeedback::default().score_value(), None);
    }
}
