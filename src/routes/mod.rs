use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    auth::AuthenticatedUser,
    error::{AppError, AppResult},
    state::AppState,
    store::{StoreError, StoreResult},
};

pub mod campaign_applications;
pub mod dropout;
pub mod employees;
pub mod employers;
pub mod health;
pub mod job_applications;
pub mod job_campaigns;
pub mod job_cards;
pub mod ratings;
pub mod users;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .filter_map(|value| match value.parse::<HeaderValue>() {
                Ok(header) => Some(header),
                Err(_) => {
                    tracing::warn!(origin = %value, "ignoring invalid CORS allowed origin");
                    None
                }
            })
            .collect();

        let allow_origin = AllowOrigin::list(headers);

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/employees", post(employees::create_employee))
        .route("/employees/sign-in", post(employees::sign_in))
        .route("/employers", post(employers::create_employer))
        .route("/employers/verify-otp", post(employers::verify_otp))
        .route("/employers/sign-in", post(employers::sign_in));

    let employee_routes = Router::new()
        .route("/employees", get(employees::list_employees))
        .route("/employees/export", get(dropout::export_employees))
        .route(
            "/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/employees/:id/ratings", get(ratings::list_employee_ratings))
        .route(
            "/employees/:id/dropout-prediction",
            get(dropout::predict_dropout),
        );

    let employer_routes = Router::new()
        .route("/employers", get(employers::list_employers))
        .route(
            "/employers/:id",
            get(employers::get_employer)
                .put(employers::update_employer)
                .delete(employers::delete_employer),
        );

    let job_card_routes = Router::new()
        .route(
            "/jobcards",
            get(job_cards::list_job_cards).post(job_cards::create_job_card),
        )
        .route("/jobcards/active", get(job_cards::list_active_job_cards))
        .route(
            "/jobcards/:id",
            get(job_cards::get_job_card)
                .put(job_cards::update_job_card)
                .delete(job_cards::delete_job_card),
        )
        .route("/jobcards/:id/status", put(job_cards::update_job_card_status));

    let job_application_routes = Router::new()
        .route(
            "/jobapplications",
            get(job_applications::list_job_applications)
                .post(job_applications::create_job_application),
        )
        .route(
            "/jobapplications/:id",
            get(job_applications::get_job_application)
                .delete(job_applications::delete_job_application),
        )
        .route(
            "/jobapplications/:id/status",
            put(job_applications::update_job_application_status),
        )
        .route("/jobapplications/:id/rating", post(ratings::rate_job_application));

    let campaign_routes = Router::new()
        .route(
            "/jobcampaigns",
            get(job_campaigns::list_job_campaigns).post(job_campaigns::create_job_campaign),
        )
        .route(
            "/jobcampaigns/active",
            get(job_campaigns::list_active_job_campaigns),
        )
        .route(
            "/jobcampaigns/:id",
            get(job_campaigns::get_job_campaign)
                .put(job_campaigns::update_job_campaign)
                .delete(job_campaigns::delete_job_campaign),
        )
        .route(
            "/campaignapplications",
            get(campaign_applications::list_campaign_applications)
                .post(campaign_applications::create_campaign_application),
        )
        .route(
            "/campaignapplications/:id",
            axum::routing::delete(campaign_applications::delete_campaign_application),
        )
        .route(
            "/campaignapplications/:id/status",
            put(campaign_applications::update_campaign_application_status),
        );

    let user_routes =
        Router::new().route("/users", get(users::list_users).post(users::create_user));

    let protected_state = state.clone();
    let protected_routes = Router::new()
        .merge(employee_routes)
        .merge(employer_routes)
        .merge(job_card_routes)
        .merge(job_application_routes)
        .merge(campaign_routes)
        .merge(user_routes)
        .layer(middleware::from_extractor_with_state::<AuthenticatedUser, _>(protected_state));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.into(),
    })
}

/// Body returned by sign-in and OTP verification.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: String,
    pub id: i32,
    pub token: String,
}

pub(crate) fn to_iso(value: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(value, Utc).to_rfc3339()
}

/// Names the missing entity instead of the generic store message.
pub(crate) fn found<T>(result: StoreResult<T>, entity: &str) -> AppResult<T> {
    result.map_err(|err| match err {
        StoreError::NotFound => AppError::not_found(format!("{entity} not found")),
        other => other.into(),
    })
}

/// Replaces a raw unique-constraint message with a readable one.
pub(crate) fn unique<T>(result: StoreResult<T>, conflict: &str) -> AppResult<T> {
    result.map_err(|err| match err {
        StoreError::Conflict(_) => AppError::conflict(conflict),
        other => other.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    #[test]
    fn iso_timestamps_are_utc_rfc3339() {
        let value = NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(to_iso(value), "2024-11-20T08:30:00+00:00");
    }

    #[test]
    fn store_errors_get_entity_names() {
        let err = found::<()>(Err(StoreError::NotFound), "Employee").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = unique::<()>(Err(StoreError::Conflict("users_email_key".into())), "taken")
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = unique::<()>(Err(StoreError::NotFound), "taken").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
