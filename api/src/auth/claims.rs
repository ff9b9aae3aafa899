use serde::{Deserialize, Serialize};

/// The caller's role as carried in the JWT.
///
/// `Admin` is a lecturer whose account carries the admin flag; there is no
/// separate administrator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Lecturer,
    Admin,
}

impl Role {
    /// Lecturer-or-admin, the staff side of every policy split.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Lecturer | Role::Admin)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Student number for students, lecturer id (stringified) for staff.
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    /// The numeric lecturer id, when the caller is staff.
    pub fn lecturer_id(&self) -> Option<i64> {
        match self.role {
            Role::Lecturer | Role::Admin => self.sub.parse().ok(),
            Role::Student => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
