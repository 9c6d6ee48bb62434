use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{NewRating, Rating};
use crate::routes::{found, to_iso};
use crate::state::AppState;
use crate::utils::json::{json_body, non_blank, path_id};

#[derive(Deserialize)]
pub struct RateApplicationRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Serialize)]
pub struct RatingResponse {
    pub id: i32,
    pub job_application_id: i32,
    pub employer_id: i32,
    pub employee_id: i32,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id,
            job_application_id: rating.job_application_id,
            employer_id: rating.employer_id,
            employee_id: rating.employee_id,
            rating: rating.rating,
            comment: rating.comment,
            created_at: to_iso(rating.created_at),
        }
    }
}

/// Rates the employee on a job application; both parties come from the application.
pub async fn rate_job_application(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<RateApplicationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RatingResponse>)> {
    let application_id = path_id(application_id, "job application")?;
    let payload = json_body(payload)?;
    let application = found(
        state.store.get_job_application(application_id),
        "Job application",
    )?;

    let score = i16::try_from(payload.rating)
        .ok()
        .filter(|score| (1..=5).contains(score))
        .ok_or_else(|| AppError::bad_request("rating must be between 1 and 5"))?;

    let rating = state.store.insert_rating(NewRating {
        job_application_id: application.id,
        employer_id: application.employer_id,
        employee_id: application.employee_id,
        rating: score,
        comment: non_blank(payload.comment),
    })?;
    tracing::info!(
        rating_id = rating.id,
        job_application_id = application.id,
        employee_id = application.employee_id,
        "recorded rating"
    );

    Ok((StatusCode::CREATED, Json(rating.into())))
}

pub async fn list_employee_ratings(
    State(state): State<AppState>,
    employee_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Vec<RatingResponse>>> {
    let employee_id = path_id(employee_id, "employee")?;
    found(state.store.get_employee(employee_id), "Employee")?;
    let ratings = state.store.list_ratings_for_employee(employee_id)?;
    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}
