use serde::Serialize;

use db::models::attendance_record::{AttendanceStatus, Model as AttendanceRecord};

#[derive(Debug, Serialize, Default)]
pub struct RecordResponse {
    pub id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub subject: String,
    pub date: String,
    pub status: Option<AttendanceStatus>,
    pub draft: bool,
    pub slot_id: Option<i64>,
    pub recorded_by: Option<i64>,
}

impl From<AttendanceRecord> for RecordResponse {
    fn from(m: AttendanceRecord) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            section_id: m.section_id,
            subject: m.subject,
            date: m.date.to_string(),
            status: Some(m.status),
            draft: m.draft,
            slot_id: m.slot_id,
            recorded_by: m.recorded_by,
        }
    }
}
