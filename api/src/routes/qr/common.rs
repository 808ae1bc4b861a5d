use serde::Serialize;

use db::models::qr_session::Model as QrSession;

/// Session view for its owner. Tokens are exposed only through the dedicated
/// token endpoint, never in listings.
#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub section_id: Option<i64>,
    pub subject: String,
    pub code: String,
    pub active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    pub created_at: String,
}

impl From<QrSession> for SessionResponse {
    fn from(m: QrSession) -> Self {
        Self {
            id: m.id,
            section_id: m.section_id,
            subject: m.subject,
            code: m.code,
            active: m.active,
            latitude: m.latitude,
            longitude: m.longitude,
            radius_m: m.radius_m,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}
