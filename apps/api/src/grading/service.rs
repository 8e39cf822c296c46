//! Grading pipeline: notebooks → model feedback → parsed evaluation → reports.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::grading::evaluator::Evaluator;
use crate::grading::feedback::{parse_evaluation, Evaluation};
use crate::grading::view::render_markdown;
use crate::layout::{paginate, AfmWrapper, Document, Page};
use crate::notebook::Notebook;
use crate::render::pdf::{render_pdf, report_geometry};
use crate::render::xlsx::render_xlsx;
use crate::render::ReportMeta;

/// Validated inputs of one grading request.
#[derive(Debug, Clone)]
pub struct GradeRequest {
    pub student_name: String,
    pub student_roll: String,
    pub assignment: Bytes,
    pub submission: Bytes,
}

/// Everything produced by one grading run. Reports are derived from it on demand.
#[derive(Debug, Clone, Serialize)]
pub struct GradedSubmission {
    pub meta: ReportMeta,
    pub feedback: String,
    pub code_analysis: Option<String>,
    pub evaluation: Evaluation,
}

impl GradedSubmission {
    pub fn overall_grade(&self) -> Option<&str> {
        self.evaluation.overall_grade.as_deref()
    }

    /// Lays the feedback and code analysis out on PDF report pages.
    pub fn paginate(&self) -> Vec<Page> {
        let document = Document::for_report(&self.feedback, self.code_analysis.as_deref());
        paginate(document.lines(), &report_geometry(), &AfmWrapper)
    }

    pub fn markdown(&self) -> String {
        render_markdown(
            &self.meta,
            &self.feedback,
            self.overall_grade(),
            self.code_analysis.as_deref(),
        )
    }
}

fn parse_notebook(label: &str, bytes: &[u8]) -> Result<Notebook, AppError> {
    Notebook::from_bytes(bytes)
        .map_err(|e| AppError::UnprocessableEntity(format!("{label} notebook: {e}")))
}

/// Runs the evaluation and the code analysis concurrently and parses the reply.
///
/// A failed evaluation fails the whole request. The code analysis is ungraded:
/// it is skipped when the submission has no code cells, and a failed analysis
/// is logged and left out of the result.
pub async fn grade_submission(
    evaluator: &dyn Evaluator,
    request: &GradeRequest,
    app_version: &str,
) -> Result<GradedSubmission, AppError> {
    let assignment = parse_notebook("assignment", &request.assignment)?;
    let submission = parse_notebook("submission", &request.submission)?;

    let assignment_content = assignment.combined_content();
    let submission_content = submission.combined_content();
    let submission_code = submission.code_content();

    info!(
        roll = %request.student_roll,
        assignment_cells = assignment.cells.len(),
        submission_cells = submission.cells.len(),
        "Grading submission"
    );

    let analysis = async {
        if submission_code.trim().is_empty() {
            return Ok::<_, AppError>(None);
        }
        match evaluator.analyze_code(&submission_code).await {
            Ok(text) => Ok(Some(text)),
            Err(e) => {
                warn!(roll = %request.student_roll, error = %e, "Code analysis failed, continuing without it");
                Ok(None)
            }
        }
    };
    let (feedback, code_analysis) = tokio::try_join!(
        evaluator.evaluate(&assignment_content, &submission_content),
        analysis
    )?;

    let evaluation = parse_evaluation(&feedback);
    info!(
        roll = %request.student_roll,
        grade = evaluation.overall_grade.as_deref().unwrap_or("-"),
        criteria = evaluation.criteria.len(),
        "Evaluation received"
    );

    Ok(GradedSubmission {
        meta: ReportMeta {
            student_name: request.student_name.clone(),
            student_roll: request.student_roll.clone(),
            date: chrono::Local::now().date_naive(),
            app_version: app_version.to_string(),
        },
        feedback,
        code_analysis,
        evaluation,
    })
}

/// Paginates and renders the PDF report on the blocking pool.
pub async fn build_pdf_report(graded: GradedSubmission, footer: String) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || {
        let pages = graded.paginate();
        let bytes = render_pdf(&pages, &graded.meta, graded.overall_grade(), &footer);
        info!(
            roll = %graded.meta.student_roll,
            pages = pages.len(),
            bytes = bytes.len(),
            "PDF report rendered"
        );
        bytes
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF render: {e}")))
}

/// Paginates and renders the Excel report on the blocking pool.
pub async fn build_xlsx_report(graded: GradedSubmission) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || {
        let pages = graded.paginate();
        let bytes = render_xlsx(&pages, &graded.evaluation, &graded.meta)
            .map_err(|e| AppError::Render(format!("xlsx: {e}")))?;
        info!(
            roll = %graded.meta.student_roll,
            rows = pages.iter().map(|p| p.rows.len()).sum::<usize>(),
            bytes = bytes.len(),
            "Excel report rendered"
        );
        Ok(bytes)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in xlsx render: {e}")))?
}
