use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, PaginatorTrait, Set};
use serde::Serialize;

/// One (session, roll number) allow-list entry. A session with zero entries
/// is open to any resolvable roll number.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "qr_allow_list")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub roll_no: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::qr_session::Entity",
        from = "Column::SessionId",
        to = "super::qr_session::Column::Id"
    )]
    Session,
}

impl Related<super::qr_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn add(
        db: &DatabaseConnection,
        session_id: i64,
        roll_no: &str,
    ) -> Result<Model, DbErr> {
        let entry = ActiveModel {
            session_id: Set(session_id),
            roll_no: Set(roll_no.to_owned()),
            ..Default::default()
        };
        entry.insert(db).await
    }

    /// Whether the session restricts check-ins at all.
    pub async fn is_restricted(db: &DatabaseConnection, session_id: i64) -> Result<bool, DbErr> {
        let n = Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await?;
        Ok(n > 0)
    }

    pub async fn contains(
        db: &DatabaseConnection,
        session_id: i64,
        roll_no: &str,
    ) -> Result<bool, DbErr> {
        Ok(Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .filter(Column::RollNo.eq(roll_no))
            .one(db)
            .await?
            .is_some())
    }
}
