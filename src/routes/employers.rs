use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt::AccountRole, otp, password};
use crate::error::{AppError, AppResult};
use crate::models::{Employer, EmployerChanges, NewEmployer};
use crate::routes::{found, message, to_iso, unique, MessageResponse, TokenResponse};
use crate::state::AppState;
use crate::utils::json::{
    check_len, json_body, non_blank, path_id, required, EMAIL_MAX_LEN, PHONE_MAX_LEN,
};

const EMAIL_TAKEN: &str = "Email is already registered";

#[derive(Deserialize)]
pub struct CreateEmployerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEmployerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
}

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct EmployerResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address_proof: Option<String>,
    pub employer_type: Option<String>,
    pub verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Employer> for EmployerResponse {
    fn from(employer: Employer) -> Self {
        Self {
            id: employer.id,
            name: employer.name,
            email: employer.email,
            age: employer.age,
            gender: employer.gender,
            phone: employer.phone,
            address_proof: employer.address_proof,
            employer_type: employer.employer_type,
            verified: employer.verified,
            created_at: to_iso(employer.created_at),
            updated_at: to_iso(employer.updated_at),
        }
    }
}

/// Registers an unverified employer and mails the OTP that confirms the address.
///
/// Nothing is persisted when the OTP email cannot be delivered.
pub async fn create_employer(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployerRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let payload = json_body(payload)?;
    let name = required("name", payload.name)?;
    let email = required("email", payload.email)?;
    check_len("email", &email, EMAIL_MAX_LEN)?;
    let phone = non_blank(payload.phone);
    if let Some(phone) = phone.as_deref() {
        check_len("phone", phone, PHONE_MAX_LEN)?;
    }
    let secret = payload
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| AppError::bad_request("password is required"))?;

    if state.store.find_employer_by_email(&email)?.is_some() {
        return Err(AppError::conflict(EMAIL_TAKEN));
    }

    let code = otp::generate_otp();
    state
        .mailer
        .send(&email, "Your OTP", &format!("Your OTP is: {code}"))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "failed to send OTP email");
            AppError::internal("Failed to send OTP email")
        })?;

    let new_employer = NewEmployer {
        name,
        email,
        password_hash: password::hash_password(&secret)?,
        age: payload.age,
        gender: non_blank(payload.gender),
        phone,
        address_proof: non_blank(payload.address_proof),
        employer_type: non_blank(payload.employer_type),
        otp: Some(code),
        verified: false,
    };
    let employer = unique(state.store.insert_employer(new_employer), EMAIL_TAKEN)?;

    let token = state
        .jwt
        .generate_token(employer.id, &employer.email, AccountRole::Employer)?;
    tracing::info!(employer_id = employer.id, "registered employer, OTP sent");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "Employer created successfully. OTP has been sent to your email.".to_string(),
            id: employer.id,
            token,
        }),
    ))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let payload = json_body(payload)?;

    let employer = state
        .store
        .find_employer_by_email(payload.email.trim())?
        .ok_or_else(|| AppError::not_found("Employer not found"))?;

    if employer.otp.as_deref() != Some(payload.otp.trim()) {
        return Err(AppError::bad_request("Invalid OTP"));
    }

    let changes = EmployerChanges {
        otp: Some(None),
        verified: Some(true),
        ..Default::default()
    };
    found(state.store.update_employer(employer.id, changes), "Employer")?;

    let token = state
        .jwt
        .generate_token(employer.id, &employer.email, AccountRole::Employer)?;
    tracing::info!(employer_id = employer.id, "employer email verified");

    Ok(Json(TokenResponse {
        message: "OTP verified successfully".to_string(),
        id: employer.id,
        token,
    }))
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let payload = json_body(payload)?;

    let employer = state
        .store
        .find_employer_by_email(payload.email.trim())?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    if !employer.verified {
        return Err(AppError::unauthorized("Email not verified"));
    }

    if !password::verify_password(&payload.password, &employer.password_hash)? {
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = state
        .jwt
        .generate_token(employer.id, &employer.email, AccountRole::Employer)?;

    Ok(Json(TokenResponse {
        message: "Sign-in successful".to_string(),
        id: employer.id,
        token,
    }))
}

pub async fn list_employers(State(state): State<AppState>) -> AppResult<Json<Vec<EmployerResponse>>> {
    let employers = state.store.list_employers()?;
    Ok(Json(employers.into_iter().map(EmployerResponse::from).collect()))
}

pub async fn get_employer(
    State(state): State<AppState>,
    employer_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<EmployerResponse>> {
    let employer_id = path_id(employer_id, "employer")?;
    let employer = found(state.store.get_employer(employer_id), "Employer")?;
    Ok(Json(employer.into()))
}

pub async fn update_employer(
    State(state): State<AppState>,
    employer_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateEmployerRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let employer_id = path_id(employer_id, "employer")?;
    let payload = json_body(payload)?;
    let existing = found(state.store.get_employer(employer_id), "Employer")?;

    let email = non_blank(payload.email).filter(|email| *email != existing.email);
    if let Some(email) = email.as_deref() {
        check_len("email", email, EMAIL_MAX_LEN)?;
        if state.store.find_employer_by_email(email)?.is_some() {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }
    }

    let phone = non_blank(payload.phone);
    if let Some(phone) = phone.as_deref() {
        check_len("phone", phone, PHONE_MAX_LEN)?;
    }

    let password_hash = match payload.password.filter(|password| !password.is_empty()) {
        Some(secret) => Some(password::hash_password(&secret)?),
        None => None,
    };

    let changes = EmployerChanges {
        name: non_blank(payload.name),
        email,
        password_hash,
        age: payload.age,
        gender: non_blank(payload.gender),
        phone,
        address_proof: non_blank(payload.address_proof),
        employer_type: non_blank(payload.employer_type),
        otp: None,
        verified: None,
    };

    unique(state.store.update_employer(employer_id, changes), EMAIL_TAKEN)?;
    tracing::info!(employer_id, "updated employer");

    Ok(message("Employer updated successfully"))
}

pub async fn delete_employer(
    State(state): State<AppState>,
    employer_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let employer_id = path_id(employer_id, "employer")?;
    found(state.store.delete_employer(employer_id), "Employer")?;
    tracing::info!(employer_id, "deleted employer");
    Ok(message("Employer deleted successfully"))
}
