//! Prompt constants for notebook grading.
//!
//! The evaluation prompt fixes the response layout that `feedback.rs` parses
//! and that the report header rules recognise. Keep the three in step.

pub const EVALUATION_MAX_TOKENS: u32 = 1500;
pub const ANALYSIS_MAX_TOKENS: u32 = 1000;

// ────────────────────────────────────────────────────────────────────────────
// Graded evaluation
// ────────────────────────────────────────────────────────────────────────────

pub const EVALUATION_SYSTEM: &str = "\
You are a programming instructor grading a student submission. Provide detailed, \
structured feedback following the exact format specified.";

pub const EVALUATION_PROMPT_TEMPLATE: &str = "\
**Assignment Instructions (Unsolved Notebook):**\n\
{assignment}\n\
\n\
**Student Submission (Solved Notebook):**\n\
{submission}\n\
\n\
Please evaluate the submission based on the following criteria and provide a structured \
response in this exact format:\n\
\n\
OVERALL_GRADE: [Grade out of 10]\n\
\n\
1. Correctness (0-5):\n\
Score: [number]\n\
Reasoning: [detailed explanation]\n\
Areas for Improvement: [specific points if any]\n\
Key Strengths: [list main strengths]\n\
\n\
2. Adherence to Instructions (0-5):\n\
Score: [number]\n\
Reasoning: [detailed explanation]\n\
Areas for Improvement: [specific points if any]\n\
Key Strengths: [list main strengths]\n\
\n\
3. Code Quality (0-5):\n\
Score: [number]\n\
Reasoning: [detailed explanation]\n\
Areas for Improvement: [specific points if any]\n\
Key Strengths: [list main strengths]\n\
\n\
4. Explanation Quality (0-5):\n\
Score: [number]\n\
Reasoning: [detailed explanation]\n\
Areas for Improvement: [specific points if any]\n\
Key Strengths: [list main strengths]\n\
\n\
Summary of Key Recommendations:\n\
[List top 3 most important improvements needed]\n\
\n\
Additional Comments: [any overall feedback or suggestions]";

// ────────────────────────────────────────────────────────────────────────────
// Ungraded code analysis
// ────────────────────────────────────────────────────────────────────────────

pub const ANALYSIS_SYSTEM: &str = "\
You are a code analysis expert providing detailed, constructive feedback. \
Write plain text without markdown emphasis.";

pub const ANALYSIS_PROMPT_TEMPLATE: &str = "\
Analyze the following code for patterns and practices (without grading it):\n\
\n\
{code}\n\
\n\
Please provide analysis in the following format:\n\
\n\
Code Structure Analysis:\n\
1. [Describe overall code organization]\n\
2. [Identify main components/functions]\n\
3. [Note any design patterns used]\n\
\n\
Programming Practices:\n\
1. [List good programming practices found]\n\
2. [Identify areas that could use improvement]\n\
3. [Note any interesting coding patterns]\n\
\n\
Code Style:\n\
1. [Comment on naming conventions]\n\
2. [Evaluate code formatting]\n\
3. [Assess documentation/comments]\n\
\n\
Advanced Features Used:\n\
1. [List any advanced language features]\n\
2. [Note any libraries/frameworks used effectively]\n\
3. [Identify any optimization techniques]\n\
\n\
Potential Learning Opportunities:\n\
1. [Suggest areas for learning/improvement]\n\
2. [Recommend additional techniques]\n\
3. [Propose alternative approaches]";

pub fn evaluation_prompt(assignment: &str, submission: &str) -> String {
    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[("{assignment}", assignment), ("{submission}", submission)],
    )
}

pub fn analysis_prompt(code: &str) -> String {
    fill_template(ANALYSIS_PROMPT_TEMPLATE, &[("{code}", code)])
}

/// Substitutes placeholders in a single left-to-right pass. Inserted values are
/// never rescanned, so notebook text containing `{submission}` stays literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(
        template.len() + values.iter().map(|(_, v)| v.len()).sum::<usize>(),
    );
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
