use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Default, Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub expires_at: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VerifyResponse {
    pub id: String,
    pub role: String,
}
