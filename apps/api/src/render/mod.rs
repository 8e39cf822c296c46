// Report serializers. Both take already-paginated pages and return bytes;
// they are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod pdf;
pub mod xlsx;

use chrono::NaiveDate;
use serde::Serialize;

pub const REPORT_TITLE: &str = "Lab Submission Evaluation Report";

/// Who and when a report is for; printed in the title block of every format.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub student_name: String,
    pub student_roll: String,
    pub date: NaiveDate,
    pub app_version: String,
}

impl ReportMeta {
    /// Roll number reduced to characters safe in a download file name.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .student_roll
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "student".to_string()
        } else {
            stem
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_meta() -> ReportMeta {
    ReportMeta {
        student_name: "Ada Lovelace".to_string(),
        student_roll: "CS-2024/017".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        app_version: "0.1.0".to_string(),
    }
}
