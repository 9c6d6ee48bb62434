use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::models::{NewUser, User};
use crate::routes::{to_iso, unique};
use crate::state::AppState;
use crate::utils::json::{check_len, json_body, required, EMAIL_MAX_LEN};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: to_iso(user.created_at),
        }
    }
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let payload = json_body(payload)?;
    let name = required("name", payload.name)?;
    let email = required("email", payload.email)?;
    check_len("email", &email, EMAIL_MAX_LEN)?;

    let user = unique(
        state.store.insert_user(NewUser { name, email }),
        "Email is already registered",
    )?;
    Ok((StatusCode::CREATED, Json(user.into())))
}
