pub mod attendance_record;
pub mod qr_allow_list;
pub mod qr_session;
pub mod section;
pub mod student;
pub mod subject_stat;
pub mod timetable_slot;
pub mod user;
