use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::models::{attendance_record, student};

#[derive(Debug, Default, Serialize)]
pub struct TokenResponse {
    pub token_id: i64,
    pub qr_string: String,
    pub course_code: String,
    pub session_id: String,
    pub expires_at: String,
    pub created_at: String,
}

impl From<db::models::attendance_token::Model> for TokenResponse {
    fn from(m: db::models::attendance_token::Model) -> Self {
        Self {
            token_id: m.token_id,
            qr_string: m.qr_string,
            course_code: m.course_code,
            session_id: m.session_id,
            expires_at: m.expires_at.to_rfc3339(),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct IssueTokenReq {
    #[validate(length(min = 2, max = 20, message = "Course code must be 2-20 characters"))]
    pub course_code: String,
    /// Defaults to ten minutes.
    #[validate(range(min = 1, max = 480, message = "Validity must be 1-480 minutes"))]
    pub validity_minutes: Option<i64>,
    /// Continue an existing session with a fresh token.
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordScanReq {
    pub qr_string: String,
    pub section_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SetPresenceReq {
    pub student_id: String,
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct RecordResponse {
    pub record_id: i64,
    pub student_id: String,
    pub student_name: Option<String>,
    pub section_id: i64,
    pub session_id: String,
    pub token_id: Option<i64>,
    /// True when the record was entered manually rather than scanned.
    pub manual_override: bool,
    pub attended_at: String,
}

impl RecordResponse {
    pub fn from_record(record: attendance_record::Model, stu: Option<student::Model>) -> Self {
        Self {
            record_id: record.record_id,
            student_id: record.student_id,
            student_name: stu.map(|s| s.name),
            section_id: record.section_id,
            session_id: record.session_id,
            manual_override: record.token_id.is_none(),
            token_id: record.token_id,
            attended_at: record.attended_at.to_rfc3339(),
        }
    }
}
