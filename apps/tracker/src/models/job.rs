use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub company: String,
    pub job_title: String,
    pub status: String,
    pub application_link: Option<String>,
    pub notes: Option<String>,
    pub date_applied: String,
    pub location: Option<String>,
    pub source: Option<String>,
}

impl JobRow {
    /// The application link, only when it is an http(s) URL safe to put in `href`.
    pub fn web_link(&self) -> Option<&str> {
        self.application_link.as_deref().filter(|link| {
            let lower = link.trim_start().to_ascii_lowercase();
            lower.starts_with("http://") || lower.starts_with("https://")
        })
    }
}

/// A validated job application payload, shared by create and edit.
/// Required fields are non-empty; blank optional fields are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub company: String,
    pub job_title: String,
    pub status: String,
    pub application_link: Option<String>,
    pub notes: Option<String>,
    pub date_applied: NaiveDate,
    pub location: Option<String>,
    pub source: Option<String>,
}

impl NewJob {
    /// Canonical `YYYY-MM-DD` text, so lexical order matches date order.
    pub fn date_applied_str(&self) -> String {
        self.date_applied.format("%Y-%m-%d").to_string()
    }
}
