use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    /// Admin-only: scope to a specific lecturer's sections.
    pub lecturer_id: Option<i64>,
    pub section_id: Option<i64>,
    pub course_code: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
