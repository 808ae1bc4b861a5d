use serde::Serialize;

use db::models::student::Model as Student;

#[derive(Debug, Serialize, Default)]
pub struct StudentResponse {
    pub id: i64,
    pub roll_no: String,
    pub name: String,
    pub email: Option<String>,
    pub section_id: i64,
    pub overall_percentage: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Student> for StudentResponse {
    fn from(m: Student) -> Self {
        Self {
            id: m.id,
            roll_no: m.roll_no,
            name: m.name,
            email: m.email,
            section_id: m.section_id,
            overall_percentage: m.overall_percentage,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}
