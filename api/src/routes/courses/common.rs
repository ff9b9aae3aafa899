use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Serialize)]
pub struct CourseResponse {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::course::Model> for CourseResponse {
    fn from(m: db::models::course::Model) -> Self {
        Self {
            course_id: m.course_id,
            course_code: m.course_code,
            course_name: m.course_name,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// A section row inside a course-details response.
#[derive(Debug, Serialize)]
pub struct CourseSection {
    pub section_id: i64,
    pub section_name: String,
    pub lecturer_id: i64,
    pub lecturer_name: String,
}

#[derive(Debug, Default, Serialize)]
pub struct CourseDetailsResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub sections: Vec<CourseSection>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseReq {
    #[validate(length(min = 2, max = 20, message = "Course code must be 2-20 characters"))]
    pub course_code: String,
    #[validate(length(min = 1, message = "Course name is required"))]
    pub course_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditCourseReq {
    #[validate(length(min = 1, message = "Course name is required"))]
    pub course_name: Option<String>,
}
