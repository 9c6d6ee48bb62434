use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt::AccountRole, password};
use crate::error::{AppError, AppResult};
use crate::models::{Employee, EmployeeChanges, NewEmployee};
use crate::routes::{found, message, to_iso, unique, MessageResponse, TokenResponse};
use crate::state::AppState;
use crate::utils::json::{check_len, json_body, non_blank, path_id, required, PHONE_MAX_LEN};

const PHONE_TAKEN: &str = "Employee with this phone number already exists";

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pin: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    #[serde(default)]
    pub open_to_work: bool,
    pub work_experience: Option<String>,
    #[serde(default)]
    pub type_of_work: Vec<String>,
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pin: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    pub open_to_work: Option<bool>,
    pub work_experience: Option<String>,
    pub type_of_work: Option<Vec<String>>,
    pub photo_url: Option<String>,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub phone: String,
    pub pin: String,
}

#[derive(Serialize)]
pub struct EmployeeCreatedResponse {
    pub message: String,
    pub id: i32,
    pub phone: String,
    pub verified: bool,
    pub token: String,
}

/// Public view of an employee; the PIN hash never leaves the store.
#[derive(Serialize)]
pub struct EmployeeResponse {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address_proof: Option<String>,
    pub open_to_work: bool,
    pub work_experience: Option<String>,
    pub type_of_work: Vec<String>,
    pub photo_url: Option<String>,
    pub verified: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            phone: employee.phone,
            age: employee.age,
            gender: employee.gender,
            address_proof: employee.address_proof,
            open_to_work: employee.open_to_work,
            work_experience: employee.work_experience,
            type_of_work: employee.type_of_work,
            photo_url: employee.photo_url,
            verified: employee.verified,
            created_at: to_iso(employee.created_at),
            updated_at: to_iso(employee.updated_at),
        }
    }
}

pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<EmployeeCreatedResponse>)> {
    let payload = json_body(payload)?;
    let name = required("name", payload.name)?;
    let phone = required("phone", payload.phone)?;
    check_len("phone", &phone, PHONE_MAX_LEN)?;
    let pin = payload
        .pin
        .filter(|pin| !pin.is_empty())
        .ok_or_else(|| AppError::bad_request("pin is required"))?;

    if state.store.find_employee_by_phone(&phone)?.is_some() {
        return Err(AppError::conflict(PHONE_TAKEN));
    }

    let new_employee = NewEmployee {
        name,
        phone,
        pin_hash: password::hash_password(&pin)?,
        age: payload.age,
        gender: non_blank(payload.gender),
        address_proof: non_blank(payload.address_proof),
        open_to_work: payload.open_to_work,
        work_experience: non_blank(payload.work_experience),
        type_of_work: payload.type_of_work,
        photo_url: non_blank(payload.photo_url),
        verified: true,
    };
    let employee = unique(state.store.insert_employee(new_employee), PHONE_TAKEN)?;

    let token = state
        .jwt
        .generate_token(employee.id, &employee.phone, AccountRole::Employee)?;
    tracing::info!(employee_id = employee.id, "registered employee");

    Ok((
        StatusCode::CREATED,
        Json(EmployeeCreatedResponse {
            message: "Employee created successfully".to_string(),
            id: employee.id,
            phone: employee.phone,
            verified: employee.verified,
            token,
        }),
    ))
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let payload = json_body(payload)?;

    let employee = state
        .store
        .find_employee_by_phone(payload.phone.trim())?
        .ok_or_else(|| AppError::unauthorized("invalid phone or pin"))?;

    if !password::verify_password(&payload.pin, &employee.pin_hash)? {
        return Err(AppError::unauthorized("invalid phone or pin"));
    }

    let token = state
        .jwt
        .generate_token(employee.id, &employee.phone, AccountRole::Employee)?;

    Ok(Json(TokenResponse {
        message: "Sign-in successful".to_string(),
        id: employee.id,
        token,
    }))
}

pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let employees = state.store.list_employees()?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

pub async fn get_employee(
    State(state): State<AppState>,
    employee_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee_id = path_id(employee_id, "employee")?;
    let employee = found(state.store.get_employee(employee_id), "Employee")?;
    Ok(Json(employee.into()))
}

pub async fn update_employee(
    State(state): State<AppState>,
    employee_id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let employee_id = path_id(employee_id, "employee")?;
    let payload = json_body(payload)?;
    let existing = found(state.store.get_employee(employee_id), "Employee")?;

    let phone = non_blank(payload.phone).filter(|phone| *phone != existing.phone);
    if let Some(phone) = phone.as_deref() {
        check_len("phone", phone, PHONE_MAX_LEN)?;
        if state.store.find_employee_by_phone(phone)?.is_some() {
            return Err(AppError::conflict(PHONE_TAKEN));
        }
    }

    let pin_hash = match payload.pin.filter(|pin| !pin.is_empty()) {
        Some(pin) => Some(password::hash_password(&pin)?),
        None => None,
    };

    let changes = EmployeeChanges {
        name: non_blank(payload.name),
        phone,
        pin_hash,
        age: payload.age,
        gender: non_blank(payload.gender),
        address_proof: non_blank(payload.address_proof),
        open_to_work: payload.open_to_work,
        work_experience: non_blank(payload.work_experience),
        type_of_work: payload.type_of_work.filter(|kinds| !kinds.is_empty()),
        photo_url: non_blank(payload.photo_url),
    };

    unique(state.store.update_employee(employee_id, changes), PHONE_TAKEN)?;
    tracing::info!(employee_id, "updated employee");

    Ok(message("Employee updated successfully"))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    employee_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let employee_id = path_id(employee_id, "employee")?;
    found(state.store.delete_employee(employee_id), "Employee")?;
    tracing::info!(employee_id, "deleted employee");
    Ok(message("Employee deleted successfully"))
}
