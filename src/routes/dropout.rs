use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::metrics::{self, DropoutFeatures};
use crate::routes::found;
use crate::state::AppState;
use crate::utils::json::path_id;

#[derive(Serialize)]
pub struct DropoutPredictionResponse {
    pub employee_id: i32,
    pub dropout_percentage: Value,
    pub prediction_features: DropoutFeatures,
}

/// Streams every employee's feature row plus the heuristic score as CSV.
pub async fn export_employees(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = metrics::collect_features(state.store.as_ref())?;
    let mut body = Vec::new();
    metrics::write_csv(&mut body, &rows)?;
    tracing::info!(rows = rows.len(), "exported employee features");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"employee_data.csv\"",
            ),
        ],
        body,
    ))
}

pub async fn predict_dropout(
    State(state): State<AppState>,
    employee_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<DropoutPredictionResponse>> {
    let employee_id = path_id(employee_id, "employee")?;
    let employee = found(state.store.get_employee(employee_id), "Employee")?;
    let features = metrics::compute_features(state.store.as_ref(), &employee)?;

    let prediction = state.predictor.predict(&features).await.map_err(|err| {
        tracing::error!(error = %err, employee_id, "dropout prediction failed");
        AppError::internal("Failed to reach ML service")
    })?;

    Ok(Json(DropoutPredictionResponse {
        employee_id: employee.id,
        dropout_percentage: prediction
            .get("dropout_percentage")
            .cloned()
            .unwrap_or(Value::Null),
        prediction_features: features,
    }))
}
