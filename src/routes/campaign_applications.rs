use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CampaignApplication, NewCampaignApplication};
use crate::routes::{found, message, to_iso, MessageResponse};
use crate::state::AppState;
use crate::status::CampaignApplicationStatus;
use crate::utils::json::{json_body, path_id};

#[derive(Deserialize)]
pub struct CreateCampaignApplicationRequest {
    pub employee_id: i32,
    pub job_campaign_id: i32,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct CampaignApplicationQuery {
    pub campaign_id: Option<i32>,
}

#[derive(Serialize)]
pub struct CampaignApplicationResponse {
    pub id: i32,
    pub employee_id: i32,
    pub job_campaign_id: i32,
    pub status: CampaignApplicationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CampaignApplication> for CampaignApplicationResponse {
    fn from(application: CampaignApplication) -> Self {
        Self {
            id: application.id,
            employee_id: application.employee_id,
            job_campaign_id: application.job_campaign_id,
            status: application.status,
            created_at: to_iso(application.created_at),
            updated_at: to_iso(application.updated_at),
        }
    }
}

fn parse_status(raw: &str) -> AppResult<CampaignApplicationStatus> {
    raw.trim().parse().map_err(|_| {
        AppError::bad_request(format!(
            "status must be {}",
            CampaignApplicationStatus::ALLOWED
        ))
    })
}

pub async fn create_campaign_application(
    State(state): State<AppState>,
    payload: Result<Json<CreateCampaignApplicationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CampaignApplicationResponse>)> {
    let payload = json_body(payload)?;
    let status = match payload.status.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_status(raw)?,
        _ => CampaignApplicationStatus::default(),
    };

    let application = state
        .store
        .insert_campaign_application(NewCampaignApplication {
            employee_id: payload.employee_id,
            job_campaign_id: payload.job_campaign_id,
            status,
        })?;
    tracing::info!(
        campaign_application_id = application.id,
        job_campaign_id = application.job_campaign_id,
        "created campaign application"
    );

    Ok((StatusCode::CREATED, Json(application.into())))
}

pub async fn list_campaign_applications(
    State(state): State<AppState>,
    query: Result<Query<CampaignApplicationQuery>, QueryRejection>,
) -> AppResult<Json<Vec<CampaignApplicationResponse>>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let campaign_id = query
        .campaign_id
        .ok_or_else(|| AppError::bad_request("campaign_id is required"))?;

    let applications = state.store.list_campaign_applications(campaign_id)?;
    Ok(Json(
        applications
            .into_iter()
            .map(CampaignApplicationResponse::from)
            .collect(),
    ))
}

pub async fn update_campaign_application_status(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let application_id = path_id(application_id, "campaign application")?;
    let payload = json_body(payload)?;
    let status = parse_status(&payload.status)?;

    found(
        state
            .store
            .set_campaign_application_status(application_id, status),
        "Campaign application",
    )?;
    tracing::info!(campaign_application_id = application_id, %status, "changed campaign application status");

    Ok(message("Application status updated successfully"))
}

pub async fn delete_campaign_application(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let application_id = path_id(application_id, "campaign application")?;
    found(
        state.store.delete_campaign_application(application_id),
        "Campaign application",
    )?;
    tracing::info!(campaign_application_id = application_id, "deleted campaign application");
    Ok(message("Campaign application deleted successfully"))
}
