use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::jobs::form::JobForm;
use crate::jobs::query::{ListParams, ListQuery};
use crate::jobs::repository::{
    delete_job, get_job, insert_job, list_jobs, update_job, update_status,
};
use crate::state::AppState;
use crate::views::{render, AddTemplate, EditTemplate, FormValues, IndexTemplate};

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
}

fn status_reply(code: StatusCode, success: bool, message: impl Into<String>) -> Response {
    let body = StatusUpdateResponse {
        success,
        message: message.into(),
    };
    (code, Json(body)).into_response()
}

fn back_to_list() -> Response {
    Redirect::to("/").into_response()
}

/// GET /
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Html<String>, AppError> {
    let query = ListQuery::from(params);
    let jobs = list_jobs(&state.db, &query).await?;
    render(&IndexTemplate::new(jobs, &query))
}

/// GET /add
pub async fn handle_add_form() -> Result<Html<String>, AppError> {
    render(&AddTemplate::new(FormValues::blank(), String::new()))
}

/// POST /add
pub async fn handle_add(
    State(state): State<AppState>,
    Form(form): Form<JobForm>,
) -> Result<Response, AppError> {
    let job = match form.validate() {
        Ok(job) => job,
        Err(err) => {
            warn!("Rejected new job: {err}");
            let page = render(&AddTemplate::new(FormValues::from(&form), err.to_string()))?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    let id = insert_job(&state.db, &job).await?;
    info!("Created job {id}: {} at {}", job.job_title, job.company);
    Ok(back_to_list())
}

/// POST /update_job_status/:id
///
/// The only JSON endpoint. An unknown id still answers 200 so existing
/// clients keep working; the miss is logged.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return status_reply(rejection.status(), false, rejection.body_text()),
    };

    // Stored exactly as sent; only an absent or empty value is rejected.
    let Some(status) = req.status.filter(|s| !s.is_empty()) else {
        return status_reply(StatusCode::BAD_REQUEST, false, "No status provided");
    };

    match update_status(&state.db, id, &status).await {
        Ok(()) => info!("Job {id} status set to '{status}'"),
        Err(AppError::NotFound(_)) => warn!("Status update for unknown job {id} changed nothing"),
        Err(e) => {
            error!("Status update for job {id} rolled back: {e}");
            return status_reply(StatusCode::INTERNAL_SERVER_ERROR, false, e.to_string());
        }
    }

    status_reply(StatusCode::OK, true, "Status updated successfully")
}

/// POST /delete/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match delete_job(&state.db, id).await {
        Ok(()) => info!("Deleted job {id}"),
        Err(AppError::NotFound(_)) => warn!("Delete of unknown job {id} was a no-op"),
        Err(e) => return Err(e),
    }
    Ok(back_to_list())
}

/// GET /edit/:id
pub async fn handle_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    match get_job(&state.db, id).await {
        Ok(job) => {
            let page = render(&EditTemplate::new(id, FormValues::from(&job), String::new()))?;
            Ok(page.into_response())
        }
        Err(AppError::NotFound(_)) => Ok(back_to_list()),
        Err(e) => Err(e),
    }
}

/// POST /edit/:id
pub async fn handle_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<JobForm>,
) -> Result<Response, AppError> {
    let job = match form.validate() {
        Ok(job) => job,
        Err(err) => {
            // An unknown id redirects whatever the form contains.
            match get_job(&state.db, id).await {
                Ok(_) => {}
                Err(AppError::NotFound(_)) => {
                    warn!("Edit of unknown job {id} ignored");
                    return Ok(back_to_list());
                }
                Err(e) => return Err(e),
            }
            warn!("Rejected edit of job {id}: {err}");
            let page = render(&EditTemplate::new(id, FormValues::from(&form), err.to_string()))?;
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    match update_job(&state.db, id, &job).await {
        Ok(()) => info!("Updated job {id}"),
        Err(AppError::NotFound(_)) => warn!("Edit of unknown job {id} was a no-op"),
        Err(e) => return Err(e),
    }
    Ok(back_to_list())
}
