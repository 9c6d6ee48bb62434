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
use crate::models::{Employee, JobApplication, NewJobApplication};
use crate::routes::{found, message, to_iso, MessageResponse};
use crate::state::AppState;
use crate::status::ApplicationStatus;
use crate::store::ApplicationParty;
use crate::utils::json::{json_body, path_id};

#[derive(Deserialize)]
pub struct CreateJobApplicationRequest {
    pub employer_id: i32,
    pub employee_id: i32,
    pub job_id: i32,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct ApplicationListQuery {
    #[serde(rename = "userType")]
    pub user_type: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Serialize)]
pub struct JobApplicationCreatedResponse {
    pub message: String,
    pub id: i32,
}

#[derive(Serialize)]
pub struct JobApplicationResponse {
    pub id: i32,
    pub employer_id: i32,
    pub employee_id: i32,
    pub job_id: i32,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<JobApplication> for JobApplicationResponse {
    fn from(application: JobApplication) -> Self {
        Self {
            id: application.id,
            employer_id: application.employer_id,
            employee_id: application.employee_id,
            job_id: application.job_id,
            status: application.status,
            created_at: to_iso(application.created_at),
            updated_at: to_iso(application.updated_at),
        }
    }
}

fn parse_status(raw: &str) -> AppResult<ApplicationStatus> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request("Status must be 'accepted' or 'rejected'"))
}

fn application_email(employee: &Employee) -> String {
    let mut body = format!("New Job Application:\n\nEmployee Name: {}\n", employee.name);
    if let Some(gender) = employee.gender.as_deref() {
        body.push_str(&format!("Gender: {gender}\n"));
    }
    if !employee.type_of_work.is_empty() {
        body.push_str(&format!(
            "Type of Work: {}\n",
            employee.type_of_work.join(", ")
        ));
    }
    if let Some(experience) = employee.work_experience.as_deref() {
        body.push_str(&format!("Work Experience: {experience}\n"));
    }
    body.push_str(&format!(
        "Employee Phone: {}\n\nPlease review the application.",
        employee.phone
    ));
    body
}

/// Records an application after notifying the employer by email.
pub async fn create_job_application(
    State(state): State<AppState>,
    payload: Result<Json<CreateJobApplicationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<JobApplicationCreatedResponse>)> {
    let payload = json_body(payload)?;
    let status = match payload.status.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_status(raw)?,
        _ => ApplicationStatus::default(),
    };

    let employer = found(state.store.get_employer(payload.employer_id), "Employer")?;
    let employee = found(state.store.get_employee(payload.employee_id), "Employee")?;

    state
        .mailer
        .send(
            &employer.email,
            "New Job Application",
            &application_email(&employee),
        )
        .await
        .map_err(|err| {
            tracing::error!(error = %err, employer_id = employer.id, "failed to notify employer");
            AppError::internal("Failed to send email to employer")
        })?;

    let application = state.store.insert_job_application(NewJobApplication {
        employer_id: employer.id,
        employee_id: employee.id,
        job_id: payload.job_id,
        status,
    })?;
    tracing::info!(
        job_application_id = application.id,
        employer_id = employer.id,
        employee_id = employee.id,
        "created job application"
    );

    Ok((
        StatusCode::CREATED,
        Json(JobApplicationCreatedResponse {
            message: "Job application created successfully".to_string(),
            id: application.id,
        }),
    ))
}

/// Lists applications for one side: `?userType=Employer|Employee&userId=N`.
pub async fn list_job_applications(
    State(state): State<AppState>,
    query: Result<Query<ApplicationListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<JobApplicationResponse>>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let user_id = query
        .user_id
        .ok_or_else(|| AppError::bad_request("userId is required"))?;
    let party = match query.user_type.as_deref().map(str::to_lowercase).as_deref() {
        Some("employer") => ApplicationParty::Employer(user_id),
        Some("employee") => ApplicationParty::Employee(user_id),
        _ => return Err(AppError::bad_request("Invalid user type")),
    };

    let applications = state.store.list_job_applications(party)?;
    Ok(Json(
        applications
            .into_iter()
            .map(JobApplicationResponse::from)
            .collect(),
    ))
}

pub async fn get_job_application(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<JobApplicationResponse>> {
    let application_id = path_id(application_id, "job application")?;
    let application = found(
        state.store.get_job_application(application_id),
        "Job application",
    )?;
    Ok(Json(application.into()))
}

pub async fn update_job_application_status(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let application_id = path_id(application_id, "job application")?;
    let payload = json_body(payload)?;
    let status = parse_status(&payload.status)?;

    found(
        state
            .store
            .set_job_application_status(application_id, status),
        "Job application",
    )?;
    tracing::info!(job_application_id = application_id, %status, "changed application status");

    Ok(message("Application status updated successfully"))
}

pub async fn delete_job_application(
    State(state): State<AppState>,
    application_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let application_id = path_id(application_id, "job application")?;
    found(
        state.store.delete_job_application(application_id),
        "Job application",
    )?;
    tracing::info!(job_application_id = application_id, "deleted job application");
    Ok(message("Job application deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn status_parsing_rejects_unknown_values() {
        assert_eq!(parse_status(" rejected ").unwrap(), ApplicationStatus::Rejected);
        assert_eq!(
            parse_status("pending").unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn email_lists_applicant_details() {
        let now = Utc::now().naive_utc();
        let employee = Employee {
            id: 3,
            name: "Meena".to_string(),
            phone: "98450".to_string(),
            pin_hash: "hash".to_string(),
            age: None,
            gender: Some("female".to_string()),
            address_proof: None,
            open_to_work: true,
            work_experience: None,
            type_of_work: vec!["cleaning".to_string(), "cooking".to_string()],
            photo_url: None,
            verified: true,
            created_at: now,
            updated_at: now,
        };
        let body = application_email(&employee);
        assert!(body.contains("Employee Name: Meena"));
        assert!(body.contains("Type of Work: cleaning, cooking"));
        assert!(body.contains("Employee Phone: 98450"));
        assert!(!body.contains("Work Experience"));
        assert!(!body.contains("hash"));
    }
}
