use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::error::{AppError, AppResult};

/// Unwraps a JSON body, turning decode failures into a 400 `{error}`.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::bad_request(rejection.body_text())),
    }
}

/// Column widths for the bounded text columns.
pub const PHONE_MAX_LEN: usize = 32;
pub const EMAIL_MAX_LEN: usize = 255;

/// Unwraps a numeric id from the URL, e.g. 400 "Invalid job card ID" for `/jobcards/abc`.
pub fn path_id(path: Result<Path<i32>, PathRejection>, entity: &str) -> AppResult<i32> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(_) => Err(AppError::bad_request(format!("Invalid {entity} ID"))),
    }
}

/// Blank strings count as omitted in partial updates.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

pub fn required(field: &str, value: Option<String>) -> AppResult<String> {
    non_blank(value).ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

pub fn check_len(field: &str, value: &str, max_chars: usize) -> AppResult<()> {
    if value.chars().count() > max_chars {
        return Err(AppError::bad_request(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(())
}
