use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::NewJob;

/// Form body of `POST /add` and `POST /edit/:id`.
/// Every field is optional here so that absence surfaces as `MissingField`
/// instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobForm {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub status: Option<String>,
    pub application_link: Option<String>,
    pub notes: Option<String>,
    pub date_applied: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
}

impl JobForm {
    /// Checks required fields in form order, then the date format.
    pub fn validate(&self) -> Result<NewJob, AppError> {
        let company = required(&self.company, "company")?;
        let job_title = required(&self.job_title, "job_title")?;
        let status = required(&self.status, "status")?;
        let date_applied = parse_date(&required(&self.date_applied, "date_applied")?)?;

        Ok(NewJob {
            company,
            job_title,
            status,
            application_link: optional(&self.application_link),
            notes: optional(&self.notes),
            date_applied,
            location: optional(&self.location),
            source: optional(&self.source),
        })
    }
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, AppError> {
    optional(value).ok_or(AppError::MissingField(field))
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| AppError::InvalidField {
        field: "date_applied",
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}
