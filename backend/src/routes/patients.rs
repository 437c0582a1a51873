//! Patient record routes
//!
//! Every handler requires a valid bearer token via [`AuthUser`].

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PatientService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use clinic_shared::types::{MessageResponse, PatientListQuery, PatientRequest, PatientResponse};
use tracing::debug;

/// Create patient routes
pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/api/patients", post(create_patient).get(list_patients))
        .route("/api/patients/", post(create_patient).get(list_patients))
        .route(
            "/api/patients/:id",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
}

/// POST /api/patients/ - Add a patient
async fn create_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PatientRequest>,
) -> ApiResult<Json<PatientResponse>> {
    debug!(caller = %auth.subject, "Creating patient");
    let record = PatientService::create(state.patients(), &req).await?;
    Ok(Json(record.into()))
}

/// GET /api/patients/ - List patients with optional filters
///
/// Query: skip, limit, name, birth_date, health_conditions, address, patient_id
async fn list_patients(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PatientListQuery>,
) -> ApiResult<Json<Vec<PatientResponse>>> {
    let records = PatientService::list(state.patients(), &query).await?;
    Ok(Json(records.into_iter().map(PatientResponse::from).collect()))
}

/// GET /api/patients/:id - Patient details
async fn get_patient(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<PatientResponse>> {
    let record = PatientService::get(state.patients(), id).await?;
    Ok(Json(record.into()))
}

/// PUT /api/patients/:id - Replace a patient's fields
async fn update_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<PatientRequest>,
) -> ApiResult<Json<PatientResponse>> {
    debug!(caller = %auth.subject, patient_id = id, "Updating patient");
    let record = PatientService::update(state.patients(), id, &req).await?;
    Ok(Json(record.into()))
}

/// DELETE /api/patients/:id - Remove a patient
async fn delete_patient(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    debug!(caller = %auth.subject, patient_id = id, "Deleting patient");
    PatientService::delete(state.patients(), id).await?;
    Ok(Json(MessageResponse::new(format!(
        "Patient with id '{}' successfully deleted!",
        id
    ))))
}
