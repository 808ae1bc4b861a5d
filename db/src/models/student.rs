use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, Set};
use serde::Serialize;

/// Represents a student in the `students` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique roll number; also the identifier presented at QR check-in.
    pub roll_no: String,
    pub name: String,
    pub email: Option<String>,
    pub section_id: i64,
    /// Attendance percentage across all subjects, overwritten on every
    /// recompute. Not clamped.
    pub overall_percentage: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id"
    )]
    Section,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
    #[sea_orm(has_many = "super::subject_stat::Entity")]
    SubjectStats,
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl Related<super::subject_stat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubjectStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        roll_no: &str,
        name: &str,
        email: Option<&str>,
        section_id: i64,
    ) -> Result<Model, DbErr> {
        let now = Utc::now();
        let student = ActiveModel {
            roll_no: Set(roll_no.to_owned()),
            name: Set(name.to_owned()),
            email: Set(email.map(|s| s.to_owned())),
            section_id: Set(section_id),
            overall_percentage: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        student.insert(db).await
    }

    pub async fn find_by_roll_no(
        db: &DatabaseConnection,
        roll_no: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::RollNo.eq(roll_no))
            .one(db)
            .await
    }
}
