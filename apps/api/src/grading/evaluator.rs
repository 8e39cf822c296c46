//! Evaluator — the seam between the grading pipeline and the language model.
//!
//! `AppState` holds an `Arc<dyn Evaluator>`. Production uses `LlmClient`;
//! tests swap in a canned implementation.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::grading::prompts::{
    analysis_prompt, evaluation_prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_SYSTEM,
    EVALUATION_MAX_TOKENS, EVALUATION_SYSTEM,
};
use crate::llm_client::LlmClient;

#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Graded evaluation of `submission` against `assignment`; returns the raw reply.
    async fn evaluate(&self, assignment: &str, submission: &str) -> Result<String, AppError>;

    /// Ungraded analysis of the submission's code cells.
    async fn analyze_code(&self, code: &str) -> Result<String, AppError>;
}

#[async_trait]
impl Evaluator for LlmClient {
    async fn evaluate(&self, assignment: &str, submission: &str) -> Result<String, AppError> {
        let prompt = evaluation_prompt(assignment, submission);
        self.complete(EVALUATION_SYSTEM, &prompt, EVALUATION_MAX_TOKENS)
            .await
            .map_err(|e| AppError::Llm(format!("evaluation failed: {e}")))
    }

    async fn analyze_code(&self, code: &str) -> Result<String, AppError> {
        let prompt = analysis_prompt(code);
        self.complete(ANALYSIS_SYSTEM, &prompt, ANALYSIS_MAX_TOKENS)
            .await
            .map_err(|e| AppError::Llm(format!("code analysis failed: {e}")))
    }
}
