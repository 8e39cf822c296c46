//! Header classification for feedback lines.
//!
//! Classification is a lexical test against `HEADER_RULES`, evaluated in order
//! (first match wins). It is not a grammar: body text that happens to start
//! with "1." is classified as a heading, and that is accepted.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;

/// Rendering class of one feedback line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClass {
    /// Numbered criterion titles and section titles.
    Heading,
    /// Field labels inside a criterion ("Score:", "Reasoning:", ...).
    Label,
    Body,
}

impl LineClass {
    /// True for any line matched by a rule.
    pub fn is_header(&self) -> bool {
        !matches!(self, LineClass::Body)
    }

    pub fn style(&self) -> LineStyle {
        match self {
            LineClass::Heading => LineStyle::HEADING,
            LineClass::Label => LineStyle::LABEL,
            LineClass::Body => LineStyle::BODY,
        }
    }
}

/// Font selection applied to every wrapped row of a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub face: FontFace,
    pub size: f32,
}

impl LineStyle {
    pub const HEADING: LineStyle = LineStyle {
        face: FontFace::HelveticaBold,
        size: 12.0,
    };
    pub const LABEL: LineStyle = LineStyle {
        face: FontFace::HelveticaBold,
        size: 10.0,
    };
    pub const BODY: LineStyle = LineStyle {
        face: FontFace::Helvetica,
        size: 10.0,
    };
}

/// Lexical pattern of a header rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPattern {
    /// Line starts with "N." for some N in `first..=last`.
    NumberedPrefix { first: u32, last: u32 },
    /// Line contains the marker anywhere.
    Contains(&'static str),
}

impl HeaderPattern {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            HeaderPattern::NumberedPrefix { first, last } => {
                (*first..=*last).any(|n| line.starts_with(&format!("{n}.")))
            }
            HeaderPattern::Contains(marker) => line.contains(marker),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRule {
    pub pattern: HeaderPattern,
    pub class: LineClass,
}

/// Markers of the grading response layout. Add a row to recognise a new header.
pub static HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        pattern: HeaderPattern::NumberedPrefix { first: 1, last: 4 },
        class: LineClass::Heading,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Summary of Key Recommendations:"),
        class: LineClass::Heading,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Code Analysis"),
        class: LineClass::Heading,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Score:"),
        class: LineClass::Label,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Reasoning:"),
        class: LineClass::Label,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Areas for Improvement:"),
        class: LineClass::Label,
    },
    HeaderRule {
        pattern: HeaderPattern::Contains("Key Strengths:"),
        class: LineClass::Label,
    },
];

/// Classifies a trimmed line against an explicit rule table.
pub fn classify_with(rules: &[HeaderRule], line: &str) -> LineClass {
    rules
        .iter()
        .find(|rule| rule.pattern.matches(line))
        .map(|rule| rule.class)
        .unwrap_or(LineClass::Body)
}

/// Classifies a trimmed line against `HEADER_RULES`.
pub fn classify(line: &str) -> LineClass {
    classify_with(HEADER_RULES, line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_criterion_is_heading() {
        assert_eq!(classify("1. Correctness (0-5):"), LineClass::Heading);
        assert_eq!(classify("4. Explanation Quality (0-5):"), LineClass::Heading);
    }

    #[test]
    fn test_number_outside_range_is_body() {
        assert_eq!(classify("5. Extra credit"), LineClass::Body);
        assert_eq!(classify("0. Preamble"), LineClass::Body);
    }

    #[test]
    fn test_scored_well_overall_is_body() {
        let class = classify("Scored well overall");
        assert_eq!(class, LineClass::Body);
        assert!(!class.is_header());
        assert_eq!(class.style(), LineStyle::BODY);
    }

    #[test]
    fn test_summary_marker_anywhere_in_line() {
        assert_eq!(
            classify("Summary of Key Recommendations:"),
            LineClass::Heading
        );
        assert_eq!(
            classify("**Summary of Key Recommendations:**"),
            LineClass::Heading
        );
    }

    #[test]
    fn test_code_analysis_heading() {
        assert_eq!(
            classify("Detailed Code Analysis (Ungraded)"),
            LineClass::Heading
        );
    }

    #[test]
    fn test_labels_are_bold_body_size() {
        for line in [
            "Score: 4",
            "Reasoning: handles edge cases",
            "Areas for Improvement: add tests",
            "Key Strengths: readable",
        ] {
            let class = classify(line);
            assert_eq!(class, LineClass::Label, "{line}");
            assert!(class.is_header());
            assert_eq!(class.style().face, FontFace::HelveticaBold);
            assert_eq!(class.style().size, LineStyle::BODY.size);
        }
    }

    #[test]
    fn test_numbered_prefix_wins_over_label() {
        // "1. Score: 3" matches both the numbered rule and "Score:"; table order decides.
        assert_eq!(classify("1. Score: 3"), LineClass::Heading);
    }

    #[test]
    fn test_leading_number_false_positive_is_accepted() {
        // Body text that starts with "1." is still a heading.
        assert_eq!(classify("1.5 seconds was the runtime"), LineClass::Heading);
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = [HeaderRule {
            pattern: HeaderPattern::Contains("Additional Comments:"),
            class: LineClass::Heading,
        }];
        assert_eq!(
            classify_with(&rules, "Additional Comments: nice work"),
            LineClass::Heading
        );
        assert_eq!(classify_with(&rules, "1. Correctness"), LineClass::Body);
    }

    #[test]
    fn test_heading_style_is_bold_and_larger() {
        let heading = LineClass::Heading.style();
        assert_eq!(heading.face, FontFace::HelveticaBold);
        assert!(heading.size > LineStyle::BODY.size);
    }
}
