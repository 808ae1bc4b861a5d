use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608200001_create_users::Migration),
            Box::new(migrations::m202608200002_create_sections::Migration),
            Box::new(migrations::m202608200003_create_students::Migration),
            Box::new(migrations::m202608200004_create_timetable_slots::Migration),
            Box::new(migrations::m202608200005_create_attendance_records::Migration),
            Box::new(migrations::m202608200006_create_subject_stats::Migration),
            Box::new(migrations::m202608200007_create_qr_sessions::Migration),
        ]
    }
}
