pub mod checkin;
pub mod scoring;
