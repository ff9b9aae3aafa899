pub mod m202507150001_create_lecturers;
pub mod m202507150002_create_students;
pub mod m202507170003_create_courses;
pub mod m202507190004_create_sections;
pub mod m202507190005_create_section_students;
pub mod m202507200006_create_attendance_tokens;
pub mod m202508130007_create_push_subscriptions;
pub mod m202508140008_create_attendance_records;
