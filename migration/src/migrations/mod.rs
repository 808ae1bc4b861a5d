pub mod m202608200001_create_users;
pub mod m202608200002_create_sections;
pub mod m202608200003_create_students;
pub mod m202608200004_create_timetable_slots;
pub mod m202608200005_create_attendance_records;
pub mod m202608200006_create_subject_stats;
pub mod m202608200007_create_qr_sessions;
