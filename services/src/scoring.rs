//! Attendance scoring engine.
//!
//! Converts raw per-session status records into persisted percentage
//! aggregates. Every recompute is a full re-scan of the non-draft history
//! followed by a whole-row overwrite, so calling it redundantly is safe and
//! the persisted stats are re-derivable at any time.

use chrono::Utc;
use db::models::{
    attendance_record::{self, AttendanceStatus},
    student, subject_stat,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};

/// Every this many late marks convert into one effective absence.
pub const LATE_PENALTY_GROUP_SIZE: u32 = 3;

/// Tallied status counts for one scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
}

impl StatusCounts {
    pub fn total(&self) -> i64 {
        self.present + self.late + self.absent
    }

    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }
}

/// Scoring policy knobs. `Default` uses [`LATE_PENALTY_GROUP_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringPolicy {
    pub late_penalty_group_size: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            late_penalty_group_size: LATE_PENALTY_GROUP_SIZE,
        }
    }
}

/// Both percentages produced by one recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOutcome {
    pub subject_percentage: i64,
    pub overall_percentage: i64,
}

/// Lateness-penalized attendance percentage.
///
/// `floor(late / group_size)` late marks count as extra absences, so lates are
/// penalized once for not being present and again each time they cross a
/// multiple of the group size. Deliberately NOT clamped: no floor of zero is
/// applied to the effective-present ratio, matching the reference behavior
/// for late-heavy histories.
pub fn compute_percentage(counts: StatusCounts, policy: ScoringPolicy) -> i64 {
    let total = counts.total();
    if total == 0 {
        return 0;
    }
    let penalty_absences = counts.late / policy.late_penalty_group_size.max(1) as i64;
    let effective_absences = counts.absent + penalty_absences;
    let effective_present = total - effective_absences;
    ((effective_present as f64 / total as f64) * 100.0).round() as i64
}

/// Tallies non-draft records for a student, optionally narrowed to a subject.
///
/// Draft marks are invisible here by definition; a student with no history at
/// all simply tallies to zero (indistinguishable from an unknown student).
pub async fn tally_counts(
    db: &DatabaseConnection,
    student_id: i64,
    subject: Option<&str>,
) -> Result<StatusCounts, DbErr> {
    let mut sel = attendance_record::Entity::find()
        .filter(attendance_record::Column::StudentId.eq(student_id))
        .filter(attendance_record::Column::Draft.eq(false));
    if let Some(subject) = subject {
        sel = sel.filter(attendance_record::Column::Subject.eq(subject));
    }

    let mut counts = StatusCounts::default();
    for record in sel.all(db).await? {
        counts.add(record.status);
    }
    Ok(counts)
}

/// Recomputes and persists the (student, subject) aggregate and the student's
/// overall percentage, returning both.
///
/// The subject_stats row is looked up by key and overwritten in full (or
/// inserted fresh), never delta-merged. Two concurrent recomputes for the
/// same key race read-then-overwrite with last-writer-wins; both writers
/// derive from the same committed history, so the survivor is still a valid
/// aggregate of some recent state.
pub async fn recalculate_stats(
    db: &DatabaseConnection,
    student_id: i64,
    subject: &str,
    policy: ScoringPolicy,
) -> Result<StatsOutcome, DbErr> {
    let now = Utc::now();

    let subject_counts = tally_counts(db, student_id, Some(subject)).await?;
    let subject_percentage = compute_percentage(subject_counts, policy);

    let existing = subject_stat::Entity::find()
        .filter(subject_stat::Column::StudentId.eq(student_id))
        .filter(subject_stat::Column::Subject.eq(subject))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut active = row.into_active_model();
            active.present_count = Set(subject_counts.present);
            active.late_count = Set(subject_counts.late);
            active.absent_count = Set(subject_counts.absent);
            active.total_sessions = Set(subject_counts.total());
            active.percentage = Set(subject_percentage);
            active.updated_at = Set(now);
            active.update(db).await?;
        }
        None => {
            let fresh = subject_stat::ActiveModel {
                student_id: Set(student_id),
                subject: Set(subject.to_owned()),
                present_count: Set(subject_counts.present),
                late_count: Set(subject_counts.late),
                absent_count: Set(subject_counts.absent),
                total_sessions: Set(subject_counts.total()),
                percentage: Set(subject_percentage),
                updated_at: Set(now),
                ..Default::default()
            };
            fresh.insert(db).await?;
        }
    }

    let overall_counts = tally_counts(db, student_id, None).await?;
    let overall_percentage = compute_percentage(overall_counts, policy);

    if let Some(row) = student::Entity::find_by_id(student_id).one(db).await? {
        let mut active = row.into_active_model();
        active.overall_percentage = Set(overall_percentage);
        active.updated_at = Set(now);
        active.update(db).await?;
    }

    Ok(StatsOutcome {
        subject_percentage,
        overall_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use db::models::{attendance_record::Model as RecordModel, section, student};
    use db::test_utils::setup_test_db;
    use sea_orm::DatabaseConnection;

    fn counts(present: i64, late: i64, absent: i64) -> StatusCounts {
        StatusCounts {
            present,
            late,
            absent,
        }
    }

    #[test]
    fn empty_history_scores_zero() {
        assert_eq!(compute_percentage(counts(0, 0, 0), ScoringPolicy::default()), 0);
    }

    #[test]
    fn all_present_and_all_absent_extremes() {
        let policy = ScoringPolicy::default();
        assert_eq!(compute_percentage(counts(10, 0, 0), policy), 100);
        assert_eq!(compute_percentage(counts(0, 0, 10), policy), 0);
    }

    #[test]
    fn three_lates_cost_one_effective_absence() {
        // total 10, penalty 1 -> round(9/10 * 100) = 90
        assert_eq!(compute_percentage(counts(7, 3, 0), ScoringPolicy::default()), 90);
    }

    #[test]
    fn two_lates_cost_nothing_extra() {
        // below the group size the lates still count toward the total only
        assert_eq!(compute_percentage(counts(8, 2, 0), ScoringPolicy::default()), 100);
    }

    #[test]
    fn mixed_history_matches_worked_example() {
        // 9 present, 3 late, 1 absent: total 13, penalty 1, effective absent 2,
        // effective present 11 -> round(11/13 * 100) = 85
        assert_eq!(compute_percentage(counts(9, 3, 1), ScoringPolicy::default()), 85);
    }

    #[test]
    fn adding_absences_never_raises_the_score() {
        let policy = ScoringPolicy::default();
        let mut prev = compute_percentage(counts(5, 2, 0), policy);
        for absent in 1..=10 {
            let next = compute_percentage(counts(5, 2, absent), policy);
            assert!(next <= prev, "absent={absent}: {next} > {prev}");
            prev = next;
        }
    }

    #[test]
    fn late_heavy_histories_are_not_clamped_upward() {
        let policy = ScoringPolicy::default();
        // 0 present, 3 late, 2 absent: total 5, penalty 1, effective absent 3,
        // effective present 2 -> 40
        assert_eq!(compute_percentage(counts(0, 3, 2), policy), 40);
        // 0 present, 6 late, 60 absent: total 66, penalty 2, effective absent
        // 62, effective present 4 -> 6
        assert_eq!(compute_percentage(counts(0, 6, 60), policy), 6);
        // Worst case at group size 1 every late cancels itself, so the result
        // bottoms out at the raw-present ratio rather than going negative.
        let harsh = ScoringPolicy {
            late_penalty_group_size: 1,
        };
        assert_eq!(compute_percentage(counts(0, 9, 3), harsh), 0);
        assert_eq!(compute_percentage(counts(3, 9, 6), harsh), 17);
    }

    async fn seed_student(db: &DatabaseConnection) -> student::Model {
        let sec = section::Model::create(db, "10-A").await.unwrap();
        student::Model::create(db, "R001", "Asha Rao", None, sec.id)
            .await
            .unwrap()
    }

    async fn mark(
        db: &DatabaseConnection,
        st: &student::Model,
        subject: &str,
        day: u32,
        status: AttendanceStatus,
        draft: bool,
    ) {
        RecordModel::upsert_mark(
            db,
            st.id,
            st.section_id,
            subject,
            NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            status,
            draft,
            None,
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let db = setup_test_db().await;
        let st = seed_student(&db).await;

        mark(&db, &st, "Maths", 1, AttendanceStatus::Present, false).await;
        mark(&db, &st, "Maths", 2, AttendanceStatus::Late, false).await;
        mark(&db, &st, "Maths", 3, AttendanceStatus::Absent, false).await;

        let first = recalculate_stats(&db, st.id, "Maths", ScoringPolicy::default())
            .await
            .unwrap();
        let second = recalculate_stats(&db, st.id, "Maths", ScoringPolicy::default())
            .await
            .unwrap();
        assert_eq!(first, second);

        let row = subject_stat::Entity::find()
            .filter(subject_stat::Column::StudentId.eq(st.id))
            .filter(subject_stat::Column::Subject.eq("Maths"))
            .one(&db)
            .await
            .unwrap()
            .expect("stat row persisted");
        assert_eq!(row.present_count, 1);
        assert_eq!(row.late_count, 1);
        assert_eq!(row.absent_count, 1);
        assert_eq!(row.total_sessions, 3);
        assert_eq!(row.percentage, first.subject_percentage);

        let st_row = student::Entity::find_by_id(st.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(st_row.overall_percentage, first.overall_percentage);
    }

    #[tokio::test]
    async fn drafts_are_invisible_until_finalized() {
        let db = setup_test_db().await;
        let st = seed_student(&db).await;

        mark(&db, &st, "Physics", 1, AttendanceStatus::Present, false).await;
        mark(&db, &st, "Physics", 2, AttendanceStatus::Absent, true).await;

        let with_draft = recalculate_stats(&db, st.id, "Physics", ScoringPolicy::default())
            .await
            .unwrap();
        assert_eq!(with_draft.subject_percentage, 100);

        // finalize the draft (true -> false) and recompute
        mark(&db, &st, "Physics", 2, AttendanceStatus::Absent, false).await;
        let finalized = recalculate_stats(&db, st.id, "Physics", ScoringPolicy::default())
            .await
            .unwrap();
        assert_eq!(finalized.subject_percentage, 50);
    }

    #[tokio::test]
    async fn overall_spans_all_subjects() {
        let db = setup_test_db().await;
        let st = seed_student(&db).await;

        mark(&db, &st, "Maths", 1, AttendanceStatus::Present, false).await;
        mark(&db, &st, "Physics", 1, AttendanceStatus::Absent, false).await;

        let out = recalculate_stats(&db, st.id, "Maths", ScoringPolicy::default())
            .await
            .unwrap();
        assert_eq!(out.subject_percentage, 100);
        assert_eq!(out.overall_percentage, 50);
    }
}
