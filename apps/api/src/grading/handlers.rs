//! Axum route handlers for the Grading API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        rejection::QueryRejection,
        Multipart, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::grading::feedback::Evaluation;
use crate::grading::service::{
    build_pdf_report, build_xlsx_report, grade_submission, GradeRequest, GradedSubmission,
};
use crate::state::AppState;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Pdf,
    Xlsx,
}

#[derive(Debug, Deserialize)]
pub struct GradeQuery {
    #[serde(default)]
    pub format: ReportFormat,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub student_name: String,
    pub student_roll: String,
    pub date: NaiveDate,
    pub app_version: String,
    pub overall_grade: Option<String>,
    pub evaluation: Evaluation,
    pub feedback: String,
    pub code_analysis: Option<String>,
    pub report_markdown: String,
}

impl From<GradedSubmission> for GradeResponse {
    fn from(graded: GradedSubmission) -> Self {
        let report_markdown = graded.markdown();
        GradeResponse {
            student_name: graded.meta.student_name,
            student_roll: graded.meta.student_roll,
            date: graded.meta.date,
            app_version: graded.meta.app_version,
            overall_grade: graded.evaluation.overall_grade.clone(),
            evaluation: graded.evaluation,
            feedback: graded.feedback,
            code_analysis: graded.code_analysis,
            report_markdown,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/grade?format=json|pdf|xlsx
///
/// Multipart fields: `student_name`, `student_roll` (text), `assignment`,
/// `submission` (.ipynb files). Grades the submission and returns the
/// evaluation as JSON or as a downloadable report.
pub async fn handle_grade(
    State(state): State<AppState>,
    query: Result<Query<GradeQuery>, QueryRejection>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = read_grade_request(multipart).await?;
    let graded = grade_submission(
        state.evaluator.as_ref(),
        &request,
        env!("CARGO_PKG_VERSION"),
    )
    .await?;

    info!(roll = %graded.meta.student_roll, format = ?query.format, "Responding with report");

    let response = match query.format {
        ReportFormat::Json => Json(GradeResponse::from(graded)).into_response(),
        ReportFormat::Pdf => {
            let file_name = format!("{}_report.pdf", graded.meta.file_stem());
            let bytes = build_pdf_report(graded, state.config.report_footer.clone()).await?;
            attachment(bytes, "application/pdf", &file_name)
        }
        ReportFormat::Xlsx => {
            let file_name = format!("{}_report.xlsx", graded.meta.file_stem());
            let bytes = build_xlsx_report(graded).await?;
            attachment(bytes, XLSX_CONTENT_TYPE, &file_name)
        }
    };
    Ok(response)
}

fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_grade_request(mut multipart: Multipart) -> Result<GradeRequest, AppError> {
    let mut student_name = None;
    let mut student_roll = None;
    let mut assignment = None;
    let mut submission = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("invalid multipart body", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "student_name" => student_name = Some(read_text(field).await?),
            "student_roll" => student_roll = Some(read_text(field).await?),
            "assignment" => assignment = Some(read_notebook_file(&name, field).await?),
            "submission" => submission = Some(read_notebook_file(&name, field).await?),
            _ => {}
        }
    }

    Ok(GradeRequest {
        student_name: require_text("student_name", student_name)?,
        student_roll: require_text("student_roll", student_roll)?,
        assignment: require_file("assignment", assignment)?,
        submission: require_file("submission", submission)?,
    })
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| multipart_error("invalid text field", e))?;
    Ok(text.trim().to_string())
}

async fn read_notebook_file(name: &str, field: Field<'_>) -> Result<Bytes, AppError> {
    if let Some(file_name) = field.file_name() {
        if !file_name.to_ascii_lowercase().ends_with(".ipynb") {
            return Err(AppError::Validation(format!(
                "{name} must be an .ipynb notebook, got '{file_name}'"
            )));
        }
    }
    field
        .bytes()
        .await
        .map_err(|e| multipart_error(&format!("failed to read {name}"), e))
}

/// Body-limit overruns surface as 413; every other multipart failure is a bad request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: upload exceeds the size limit"))
    } else {
        AppError::Validation(format!("{context}: {}", e.body_text()))
    }
}

fn require_text(name: &str, value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn require_file(name: &str, value: Option<Bytes>) -> Result<Bytes, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} notebook is required")))
}
