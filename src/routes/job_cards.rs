use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{JobCard, JobCardChanges, NewJobCard};
use crate::routes::{found, message, to_iso, MessageResponse};
use crate::state::AppState;
use crate::utils::json::{json_body, non_blank, path_id, required};

#[derive(Deserialize)]
pub struct CreateJobCardRequest {
    pub employer_id: Option<i32>,
    pub pincode: Option<i32>,
    pub location: Option<String>,
    pub gender: Option<String>,
    #[serde(default)]
    pub job_type: Vec<String>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateJobCardRequest {
    pub employer_id: Option<i32>,
    pub pincode: Option<i32>,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub job_type: Option<Vec<String>>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: Option<i32>,
}

#[derive(Deserialize)]
pub struct JobCardStatusRequest {
    pub active: Option<bool>,
}

#[derive(Serialize)]
pub struct JobCardResponse {
    pub id: i32,
    pub employer_id: i32,
    pub pincode: Option<i32>,
    pub location: String,
    pub gender: Option<String>,
    pub job_type: Vec<String>,
    pub salary: Option<String>,
    pub duration: Option<String>,
    pub experience_required: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub working_hours: Option<String>,
    pub holidays: Option<String>,
    pub vacancy: i32,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobCard> for JobCardResponse {
    fn from(card: JobCard) -> Self {
        Self {
            id: card.id,
            employer_id: card.employer_id,
            pincode: card.pincode,
            location: card.location,
            gender: card.gender,
            job_type: card.job_type,
            salary: card.salary,
            duration: card.duration,
            experience_required: card.experience_required,
            available_from: card.available_from,
            working_hours: card.working_hours,
            holidays: card.holidays,
            vacancy: card.vacancy,
            active: card.active,
            created_at: to_iso(card.created_at),
            updated_at: to_iso(card.updated_at),
        }
    }
}

fn check_vacancy(vacancy: Option<i32>) -> AppResult<Option<i32>> {
    match vacancy {
        Some(count) if count < 0 => Err(AppError::bad_request("vacancy must not be negative")),
        other => Ok(other),
    }
}

pub async fn create_job_card(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobCardRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JobCardResponse>)> {
    let payload = json_body(payload)?;
    let employer_id = payload
        .employer_id
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request("employer_id is required"))?;
    let location = required("location", payload.location)?;

    let new_card = NewJobCard {
        employer_id,
        pincode: payload.pincode,
        location,
        gender: non_blank(payload.gender),
        job_type: payload.job_type,
        salary: non_blank(payload.salary),
        duration: non_blank(payload.duration),
        experience_required: non_blank(payload.experience_required),
        available_from: payload.available_from,
        working_hours: non_blank(payload.working_hours),
        holidays: non_blank(payload.holidays),
        vacancy: check_vacancy(payload.vacancy)?.unwrap_or(1),
        active: payload.active.unwrap_or(true),
    };
    let card = state.store.insert_job_card(new_card)?;
    tracing::info!(job_card_id = card.id, employer_id, "created job card");

    Ok((StatusCode::CREATED, Json(card.into())))
}

pub async fn list_job_cards(State(state): State<AppState>) -> AppResult<Json<Vec<JobCardResponse>>> {
    let cards = state.store.list_job_cards(false)?;
    Ok(Json(cards.into_iter().map(JobCardResponse::from).collect()))
}

pub async fn list_active_job_cards(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobCardResponse>>> {
    let cards = state.store.list_job_cards(true)?;
    Ok(Json(cards.into_iter().map(JobCardResponse::from).collect()))
}

pub async fn get_job_card(
    State(state): State<AppState>,
    job_card_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<JobCardResponse>> {
    let job_card_id = path_id(job_card_id, "job card")?;
    let card = found(state.store.get_job_card(job_card_id), "Job card")?;
    Ok(Json(card.into()))
}

pub async fn update_job_card(
    State(state): State<AppState>,
    job_card_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateJobCardRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let job_card_id = path_id(job_card_id, "job card")?;
    let payload = json_body(payload)?;

    let changes = JobCardChanges {
        employer_id: payload.employer_id.filter(|id| *id > 0),
        pincode: payload.pincode,
        location: non_blank(payload.location),
        gender: non_blank(payload.gender),
        job_type: payload.job_type.filter(|kinds| !kinds.is_empty()),
        salary: non_blank(payload.salary),
        duration: non_blank(payload.duration),
        experience_required: non_blank(payload.experience_required),
        available_from: payload.available_from,
        working_hours: non_blank(payload.working_hours),
        holidays: non_blank(payload.holidays),
        vacancy: check_vacancy(payload.vacancy)?,
        active: None,
    };

    found(state.store.update_job_card(job_card_id, changes), "Job card")?;
    tracing::info!(job_card_id, "updated job card");

    Ok(message("Job card updated successfully"))
}

/// Opens or closes a job card without touching its other fields.
pub async fn update_job_card_status(
    State(state): State<AppState>,
    job_card_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<JobCardStatusRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let job_card_id = path_id(job_card_id, "job card")?;
    let payload = json_body(payload)?;
    let active = payload
        .active
        .ok_or_else(|| AppError::bad_request("active must be true or false"))?;

    let changes = JobCardChanges {
        active: Some(active),
        ..Default::default()
    };
    found(state.store.update_job_card(job_card_id, changes), "Job card")?;
    tracing::info!(job_card_id, active, "changed job card status");

    Ok(message("Job card status updated successfully"))
}

pub async fn delete_job_card(
    State(state): State<AppState>,
    job_card_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let job_card_id = path_id(job_card_id, "job card")?;
    found(state.store.delete_job_card(job_card_id), "Job card")?;
    tracing::info!(job_card_id, "deleted job card");
    Ok(message("Job card deleted successfully"))
}
