use askama::Template;
use axum::response::Html;

use crate::errors::AppError;
use crate::jobs::form::JobForm;
use crate::jobs::query::{ListQuery, SortKey, SortOrder};
use crate::models::job::JobRow;

/// Offered in the status inputs. Any other text is still accepted.
pub const STATUS_SUGGESTIONS: &[&str] = &[
    "Applied",
    "Interview",
    "Offer",
    "Rejected",
    "Ghosted",
    "Withdrawn",
];

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub jobs: Vec<JobRow>,
    pub filter_status: String,
    pub sort_by: &'static str,
    pub order: &'static str,
    pub statuses: &'static [&'static str],
    sort_key: SortKey,
    sort_order: SortOrder,
}

impl IndexTemplate {
    pub fn new(jobs: Vec<JobRow>, query: &ListQuery) -> Self {
        IndexTemplate {
            jobs,
            filter_status: query.status.clone().unwrap_or_default(),
            sort_by: query.sort_key.column(),
            order: query.order.as_sql(),
            statuses: STATUS_SUGGESTIONS,
            sort_key: query.sort_key,
            sort_order: query.order,
        }
    }

    /// Direction a column header link should request: the current column
    /// flips, any other column starts ascending.
    pub fn next_order(&self, column: &str) -> &'static str {
        if self.sort_key.column() == column {
            self.sort_order.reversed().as_sql()
        } else {
            SortOrder::Asc.as_sql()
        }
    }

    pub fn arrow(&self, column: &str) -> &'static str {
        match (self.sort_key.column() == column, self.sort_order) {
            (false, _) => "",
            (true, SortOrder::Asc) => "▲",
            (true, SortOrder::Desc) => "▼",
        }
    }
}

/// Field values echoed back into the add and edit forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub company: String,
    pub job_title: String,
    pub status: String,
    pub application_link: String,
    pub notes: String,
    pub date_applied: String,
    pub location: String,
    pub source: String,
}

impl FormValues {
    /// Empty form, dated today.
    pub fn blank() -> Self {
        FormValues {
            date_applied: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }
}

impl From<&JobForm> for FormValues {
    fn from(form: &JobForm) -> Self {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        FormValues {
            company: value(&form.company),
            job_title: value(&form.job_title),
            status: value(&form.status),
            application_link: value(&form.application_link),
            notes: value(&form.notes),
            date_applied: value(&form.date_applied),
            location: value(&form.location),
            source: value(&form.source),
        }
    }
}

impl From<&JobRow> for FormValues {
    fn from(job: &JobRow) -> Self {
        let value = |v: &Option<String>| v.clone().unwrap_or_default();
        FormValues {
            company: job.company.clone(),
            job_title: job.job_title.clone(),
            status: job.status.clone(),
            application_link: value(&job.application_link),
            notes: value(&job.notes),
            date_applied: job.date_applied.clone(),
            location: value(&job.location),
            source: value(&job.source),
        }
    }
}

#[derive(Template)]
#[template(path = "add.html")]
pub struct AddTemplate {
    pub form: FormValues,
    pub error: String,
    pub statuses: &'static [&'static str],
}

impl AddTemplate {
    pub fn new(form: FormValues, error: String) -> Self {
        AddTemplate {
            form,
            error,
            statuses: STATUS_SUGGESTIONS,
        }
    }
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub id: i64,
    pub form: FormValues,
    pub error: String,
    pub statuses: &'static [&'static str],
}

impl EditTemplate {
    pub fn new(id: i64, form: FormValues, error: String) -> Self {
        EditTemplate {
            id,
            form,
            error,
            statuses: STATUS_SUGGESTIONS,
        }
    }
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
