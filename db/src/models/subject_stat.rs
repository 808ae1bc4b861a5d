use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Persisted per-(student, subject) attendance aggregate.
///
/// Derived entirely from non-draft attendance records; every recompute
/// overwrites the whole row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "subject_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub present_count: i64,
    pub late_count: i64,
    pub absent_count: i64,
    pub total_sessions: i64,
    pub percentage: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
