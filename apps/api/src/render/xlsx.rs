//! Excel serializer: a structured summary sheet plus the paginated feedback.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::grading::feedback::Evaluation;
use crate::layout::Page;
use crate::render::{ReportMeta, REPORT_TITLE};

const SUMMARY_SHEET: &str = "Summary";
const FEEDBACK_SHEET: &str = "Feedback";
const CRITERIA_COLUMNS: [&str; 6] = [
    "Criterion",
    "Score",
    "Max",
    "Reasoning",
    "Areas for Improvement",
    "Key Strengths",
];

struct Formats {
    title: Format,
    bold: Format,
    wrapped: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(16),
            bold: Format::new().set_bold(),
            wrapped: Format::new().set_text_wrap().set_align(FormatAlign::Top),
        }
    }
}

/// Builds the workbook and returns its bytes.
pub fn render_xlsx(
    pages: &[Page],
    evaluation: &Evaluation,
    meta: &ReportMeta,
) -> Result<Vec<u8>, XlsxError> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    write_summary(summary, evaluation, meta, &formats)?;

    let feedback = workbook.add_worksheet();
    feedback.set_name(FEEDBACK_SHEET)?;
    write_feedback(feedback, pages, &formats)?;

    workbook.save_to_buffer()
}

fn write_summary(
    sheet: &mut Worksheet,
    evaluation: &Evaluation,
    meta: &ReportMeta,
    formats: &Formats,
) -> Result<(), XlsxError> {
    sheet.write_string_with_format(0, 0, REPORT_TITLE, &formats.title)?;

    let info = [
        ("Student Name", meta.student_name.clone()),
        ("Roll Number", meta.student_roll.clone()),
        ("Date", meta.date.format("%Y-%m-%d").to_string()),
        ("App Version", meta.app_version.clone()),
        (
            "Overall Grade",
            evaluation.overall_grade.clone().unwrap_or_default(),
        ),
    ];
    let mut row: u32 = 2;
    for (label, value) in info {
        sheet.write_string_with_format(row, 0, label, &formats.bold)?;
        sheet.write_string(row, 1, value)?;
        row += 1;
    }

    row += 1;
    for (col, heading) in CRITERIA_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *heading, &formats.bold)?;
    }
    row += 1;

    for criterion in &evaluation.criteria {
        sheet.write_string_with_format(row, 0, criterion.title.as_str(), &formats.wrapped)?;
        match (criterion.score_value(), criterion.score.as_deref()) {
            (Some(value), _) => {
                sheet.write_number(row, 1, value)?;
            }
            (None, Some(text)) => {
                sheet.write_string(row, 1, text)?;
            }
            (None, None) => {}
        }
        if let Some(max) = criterion.max_score {
            sheet.write_number(row, 2, max)?;
        }
        for (col, text) in [
            (3u16, &criterion.reasoning),
            (4, &criterion.areas_for_improvement),
            (5, &criterion.key_strengths),
        ] {
            sheet.write_string_with_format(row, col, text.as_str(), &formats.wrapped)?;
        }
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Summary of Key Recommendations", &formats.bold)?;
    row += 1;
    for (i, recommendation) in evaluation.recommendations.iter().enumerate() {
        sheet.write_number(row, 0, (i + 1) as u32)?;
        sheet.write_string_with_format(row, 1, recommendation.as_str(), &formats.wrapped)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Additional Comments", &formats.bold)?;
    sheet.write_string_with_format(
        row + 1,
        0,
        evaluation.additional_comments.as_str(),
        &formats.wrapped,
    )?;

    sheet.set_column_width(0, 30)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(2, 6)?;
    for col in 3..=5 {
        sheet.set_column_width(col, 50)?;
    }
    Ok(())
}

/// One spreadsheet row per laid-out row, keeping the page it landed on.
fn write_feedback(sheet: &mut Worksheet, pages: &[Page], formats: &Formats) -> Result<(), XlsxError> {
    sheet.write_string_with_format(0, 0, "Page", &formats.bold)?;
    sheet.write_string_with_format(0, 1, "Text", &formats.bold)?;

    let mut row: u32 = 1;
    for (page_index, page) in pages.iter().enumerate() {
        for laid_out in &page.rows {
            sheet.write_number(row, 0, (page_index + 1) as u32)?;
            if laid_out.class.is_header() {
                sheet.write_string_with_format(row, 1, laid_out.text.as_str(), &formats.bold)?;
            } else {
                sheet.write_string(row, 1, laid_out.text.as_str())?;
            }
            row += 1;
        }
    }

    sheet.set_column_width(0, 6)?;
    sheet.set_column_width(1, 100)?;
    Ok(())
}
