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
use crate::models::{JobCampaign, JobCampaignChanges, NewJobCampaign};
use crate::routes::{found, message, to_iso, MessageResponse};
use crate::state::AppState;
use crate::utils::json::{json_body, non_blank, path_id, required};

#[derive(Deserialize)]
pub struct CreateJobCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateJobCampaignRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Serialize)]
pub struct JobCampaignResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobCampaign> for JobCampaignResponse {
    fn from(campaign: JobCampaign) -> Self {
        Self {
            id: campaign.id,
            title: campaign.title,
            description: campaign.description,
            location: campaign.location,
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            active: campaign.active,
            created_at: to_iso(campaign.created_at),
            updated_at: to_iso(campaign.updated_at),
        }
    }
}

fn check_window(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(AppError::bad_request(
            "start_date must not be after end_date",
        )),
        _ => Ok(()),
    }
}

pub async fn create_job_campaign(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobCampaignRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JobCampaignResponse>)> {
    let payload = json_body(payload)?;
    let title = required("title", payload.title)?;
    check_window(payload.start_date, payload.end_date)?;

    let campaign = state.store.insert_job_campaign(NewJobCampaign {
        title,
        description: non_blank(payload.description),
        location: non_blank(payload.location),
        start_date: payload.start_date,
        end_date: payload.end_date,
        active: payload.active.unwrap_or(true),
    })?;
    tracing::info!(job_campaign_id = campaign.id, "created job campaign");

    Ok((StatusCode::CREATED, Json(campaign.into())))
}

pub async fn list_job_campaigns(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobCampaignResponse>>> {
    let campaigns = state.store.list_job_campaigns(false)?;
    Ok(Json(
        campaigns.into_iter().map(JobCampaignResponse::from).collect(),
    ))
}

pub async fn list_active_job_campaigns(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobCampaignResponse>>> {
    let campaigns = state.store.list_job_campaigns(true)?;
    Ok(Json(
        campaigns.into_iter().map(JobCampaignResponse::from).collect(),
    ))
}

pub async fn get_job_campaign(
    State(state): State<AppState>,
    campaign_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<JobCampaignResponse>> {
    let campaign_id = path_id(campaign_id, "job campaign")?;
    let campaign = found(state.store.get_job_campaign(campaign_id), "Job campaign")?;
    Ok(Json(campaign.into()))
}

pub async fn update_job_campaign(
    State(state): State<AppState>,
    campaign_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateJobCampaignRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let campaign_id = path_id(campaign_id, "job campaign")?;
    let payload = json_body(payload)?;
    let existing = found(state.store.get_job_campaign(campaign_id), "Job campaign")?;
    check_window(
        payload.start_date.or(existing.start_date),
        payload.end_date.or(existing.end_date),
    )?;

    let changes = JobCampaignChanges {
        title: non_blank(payload.title),
        description: non_blank(payload.description),
        location: non_blank(payload.location),
        start_date: payload.start_date,
        end_date: payload.end_date,
        active: payload.active,
    };
    found(
        state.store.update_job_campaign(campaign_id, changes),
        "Job campaign",
    )?;
    tracing::info!(job_campaign_id = campaign_id, "updated job campaign");

    Ok(message("Job campaign updated successfully"))
}

pub async fn delete_job_campaign(
    State(state): State<AppState>,
    campaign_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let campaign_id = path_id(campaign_id, "job campaign")?;
    found(state.store.delete_job_campaign(campaign_id), "Job campaign")?;
    tracing::info!(job_campaign_id = campaign_id, "deleted job campaign");
    Ok(message("Job campaign deleted successfully"))
}
