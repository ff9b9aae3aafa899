use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use db::models::{course, lecturer, section};

#[derive(Debug, Default, Serialize)]
pub struct SectionResponse {
    pub section_id: i64,
    pub section_name: String,
    pub course_code: String,
    pub course_name: String,
    pub lecturer_id: i64,
    pub lecturer_name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSectionReq {
    #[validate(length(min = 1, max = 100, message = "Section name must be 1-100 characters"))]
    pub section_name: String,
    #[validate(length(min = 2, max = 20, message = "Course code must be 2-20 characters"))]
    pub course_code: String,
    pub lecturer_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditSectionReq {
    #[validate(length(min = 1, max = 100, message = "Section name must be 1-100 characters"))]
    pub section_name: Option<String>,
    pub lecturer_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollStudentReq {
    pub student_id: String,
}

/// Joins course and lecturer display names onto raw section rows.
pub async fn with_display_names(
    db: &DatabaseConnection,
    sections: Vec<section::Model>,
) -> Result<Vec<SectionResponse>, DbErr> {
    let course_codes: Vec<String> = sections.iter().map(|s| s.course_code.clone()).collect();
    let lecturer_ids: Vec<i64> = sections.iter().map(|s| s.lecturer_id).collect();

    let course_names: HashMap<String, String> = course::Entity::find()
        .filter(course::Column::CourseCode.is_in(course_codes))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.course_code, c.course_name))
        .collect();
    let lecturer_names: HashMap<i64, String> = lecturer::Entity::find()
        .filter(lecturer::Column::LecturerId.is_in(lecturer_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|l| (l.lecturer_id, l.name))
        .collect();

    Ok(sections
        .into_iter()
        .map(|s| SectionResponse {
            course_name: course_names.get(&s.course_code).cloned().unwrap_or_default(),
            lecturer_name: lecturer_names.get(&s.lecturer_id).cloned().unwrap_or_default(),
            section_id: s.section_id,
            section_name: s.section_name,
            course_code: s.course_code,
            lecturer_id: s.lecturer_id,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        })
        .collect())
}
