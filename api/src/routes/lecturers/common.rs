use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Serialize)]
pub struct LecturerResponse {
    pub lecturer_id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<db::models::lecturer::Model> for LecturerResponse {
    fn from(m: db::models::lecturer::Model) -> Self {
        Self {
            lecturer_id: m.lecturer_id,
            name: m.name,
            email: m.email,
            admin: m.admin,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLecturerReq {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub admin: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditLecturerReq {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub admin: Option<bool>,
}
