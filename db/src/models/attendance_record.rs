use chrono::{NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use serde::{Deserialize, Serialize};

/// One attendance mark for one student, one subject, one calendar date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub section_id: i64,
    pub subject: String,
    pub date: Date,
    pub status: AttendanceStatus,
    /// Draft marks are persisted but invisible to every stat tally until
    /// finalized.
    pub draft: bool,
    /// Scheduled-session reference, when the mark came from a timetabled
    /// lesson.
    pub slot_id: Option<i64>,
    /// Teacher who recorded the mark, when known.
    pub recorded_by: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::section::Entity",
        from = "Column::SectionId",
        to = "super::section::Column::Id"
    )]
    Section,
    #[sea_orm(
        belongs_to = "super::timetable_slot::Entity",
        from = "Column::SlotId",
        to = "super::timetable_slot::Column::Id"
    )]
    Slot,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::section::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Section.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Finds the record a new mark for this key would collide with.
    ///
    /// The key is (student, date, slot) when a slot is given, otherwise
    /// (student, date, subject). Uniqueness is lookup-before-write, not a DB
    /// constraint.
    pub async fn find_existing(
        db: &DatabaseConnection,
        student_id: i64,
        date: NaiveDate,
        subject: &str,
        slot_id: Option<i64>,
    ) -> Result<Option<Model>, DbErr> {
        let mut sel = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Date.eq(date));
        sel = match slot_id {
            Some(slot) => sel.filter(Column::SlotId.eq(slot)),
            None => sel.filter(Column::Subject.eq(subject)),
        };
        sel.one(db).await
    }

    /// Inserts or overwrites the mark for this key.
    ///
    /// On an existing record the status is overwritten and the draft flag may
    /// transition true→false but never back; correction paths cannot demote a
    /// committed mark to a draft. Returns the row and whether it was created.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_mark(
        db: &DatabaseConnection,
        student_id: i64,
        section_id: i64,
        subject: &str,
        date: NaiveDate,
        status: AttendanceStatus,
        draft: bool,
        slot_id: Option<i64>,
        recorded_by: Option<i64>,
    ) -> Result<(Model, bool), DbErr> {
        let now = Utc::now();

        if let Some(existing) = Self::find_existing(db, student_id, date, subject, slot_id).await? {
            let keep_final = !existing.draft;
            let mut active = existing.into_active_model();
            active.status = Set(status);
            active.draft = Set(if keep_final { false } else { draft });
            active.recorded_by = Set(recorded_by);
            active.updated_at = Set(now);
            let updated = active.update(db).await?;
            return Ok((updated, false));
        }

        let record = ActiveModel {
            student_id: Set(student_id),
            section_id: Set(section_id),
            subject: Set(subject.to_owned()),
            date: Set(date),
            status: Set(status),
            draft: Set(draft),
            slot_id: Set(slot_id),
            recorded_by: Set(recorded_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok((record.insert(db).await?, true))
    }
}
