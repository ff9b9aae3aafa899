pub mod attendance_record;
pub mod attendance_token;
pub mod course;
pub mod lecturer;
pub mod push_subscription;
pub mod section;
pub mod section_student;
pub mod student;

pub use attendance_record::Entity as AttendanceRecord;
pub use attendance_token::Entity as AttendanceToken;
pub use course::Entity as Course;
pub use lecturer::Entity as Lecturer;
pub use push_subscription::Entity as PushSubscription;
pub use section::Entity as Section;
pub use section_student::Entity as SectionStudent;
pub use student::Entity as Student;
