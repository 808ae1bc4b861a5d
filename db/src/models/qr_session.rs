use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, QueryOrder, Set};
use serde::Serialize;

/// One self-check-in campaign.
///
/// `code` is the stable identifier baked into the shareable link;
/// `rotating_token` is the short-lived secret shown in the QR itself, with
/// the previous token kept as a one-step grace buffer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "qr_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub section_id: Option<i64>,
    pub subject: String,
    pub created_by: Option<i64>,
    pub code: String,
    #[serde(skip_serializing)]
    pub rotating_token: String,
    #[serde(skip_serializing)]
    pub previous_token: Option<String>,
    pub token_updated_at: DateTime<Utc>,
    pub active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::qr_allow_list::Entity")]
    AllowList,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::qr_allow_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AllowList.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Random hex string, used for both public codes and rotating tokens.
pub fn generate_token(bytes: usize) -> String {
    use rand::RngCore;
    let mut buf = vec![0u8; bytes];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

impl Model {
    /// Starts a new active session with a fresh public code and first token.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        section_id: Option<i64>,
        subject: &str,
        created_by: Option<i64>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius_m: Option<f64>,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let session = ActiveModel {
            section_id: Set(section_id),
            subject: Set(subject.to_owned()),
            created_by: Set(created_by),
            code: Set(generate_token(8)),
            rotating_token: Set(generate_token(16)),
            previous_token: Set(None),
            token_updated_at: Set(now),
            active: Set(true),
            latitude: Set(latitude),
            longitude: Set(longitude),
            radius_m: Set(radius_m),
            created_at: Set(now),
            ..Default::default()
        };
        session.insert(db).await
    }

    /// Active session by public code, or the most recently created active
    /// session when the code is omitted.
    ///
    /// The fallback exists for the single-session "current class" display;
    /// it depends on creation order and is only as good as that assumption.
    pub async fn find_active(
        db: &DatabaseConnection,
        code: Option<&str>,
    ) -> Result<Option<Model>, DbErr> {
        let mut sel = Entity::find().filter(Column::Active.eq(true));
        if let Some(code) = code {
            sel = sel.filter(Column::Code.eq(code));
        } else {
            sel = sel.order_by_desc(Column::CreatedAt);
        }
        sel.one(db).await
    }

    /// Whether the presented token matches the current or the grace token.
    pub fn accepts_token(&self, token: &str) -> bool {
        token == self.rotating_token || self.previous_token.as_deref() == Some(token)
    }
}
