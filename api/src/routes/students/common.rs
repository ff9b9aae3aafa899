use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Serialize)]
pub struct StudentResponse {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::student::Model> for StudentResponse {
    fn from(m: db::models::student::Model) -> Self {
        Self {
            student_id: m.student_id,
            name: m.name,
            email: m.email,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentReq {
    #[validate(length(min = 1, max = 40, message = "Student number must be 1-40 characters"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditStudentReq {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}
