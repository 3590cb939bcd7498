use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::CaseStore;
use crate::error::{ModelError, RenderError};
use crate::models::{FieldBag, InletOutletConfig, InletOutletZone, ZoneShape};
use crate::render;

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Model errors are the user's to fix and are returned as-is.
fn model_error(e: ModelError) -> (StatusCode, String) {
    let status = match e {
        ModelError::ZoneNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("Rejected edit: {}", e);
    (status, e.to_string())
}

fn render_error(e: RenderError) -> (StatusCode, String) {
    tracing::error!("Export failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Runs a fallible edit on one zone and returns the zone as it stands
/// afterwards.
fn edit_zone(
    store: &CaseStore,
    id: Uuid,
    edit: impl FnOnce(&mut InletOutletZone) -> Result<(), ModelError>,
) -> ApiResult<Json<InletOutletZone>> {
    store
        .update(|doc| -> Result<InletOutletZone, ModelError> {
            let zone = doc.inout.zone_mut(id)?;
            edit(zone)?;
            Ok(zone.clone())
        })
        .map_err(internal_error)?
        .map(Json)
        .map_err(model_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Configuration
// ============================================================

pub async fn get_inout(State(store): State<CaseStore>) -> ApiResult<Json<InletOutletConfig>> {
    store
        .read(|doc| doc.inout.clone())
        .map(Json)
        .map_err(internal_error)
}

pub async fn save_settings(
    State(store): State<CaseStore>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletConfig>> {
    store
        .update(|doc| doc.inout.save_settings(&bag).map(|_| doc.inout.clone()))
        .map_err(internal_error)?
        .map(Json)
        .map_err(model_error)
}

pub async fn render_xml(State(store): State<CaseStore>) -> ApiResult<impl IntoResponse> {
    let xml = store
        .read(|doc| render::render(&doc.inout))
        .map_err(internal_error)?
        .map_err(render_error)?;
    Ok(([(header::CONTENT_TYPE, "text/xml; charset=utf-8")], xml))
}

// ============================================================
// Zones
// ============================================================

/// Input for adding a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZoneInput {
    pub shape: ZoneShape,
    /// Handle of the CAD object drawn for the zone, if the GUI already made one.
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetShapeInput {
    pub shape: ZoneShape,
}

pub async fn list_zones(State(store): State<CaseStore>) -> ApiResult<Json<Vec<InletOutletZone>>> {
    store
        .read(|doc| doc.inout.zones().to_vec())
        .map(Json)
        .map_err(internal_error)
}

pub async fn create_zone(
    State(store): State<CaseStore>,
    Json(input): Json<CreateZoneInput>,
) -> ApiResult<(StatusCode, Json<InletOutletZone>)> {
    store
        .update(|doc| -> Result<InletOutletZone, ModelError> {
            let zone = doc.inout.add_zone(input.shape)?;
            zone.proxy = input.proxy;
            Ok(zone.clone())
        })
        .map_err(internal_error)?
        .map(|zone| (StatusCode::CREATED, Json(zone)))
        .map_err(model_error)
}

pub async fn get_zone(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InletOutletZone>> {
    store
        .read(|doc| doc.inout.zone(id).cloned())
        .map_err(internal_error)?
        .map(Json)
        .map_err(model_error)
}

/// Removes a zone and returns it, so the GUI can release its CAD proxy.
pub async fn delete_zone(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<InletOutletZone>> {
    store
        .update(|doc| doc.inout.remove_zone(id))
        .map_err(internal_error)?
        .map(Json)
        .map_err(model_error)
}

pub async fn set_zone_shape(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<SetShapeInput>,
) -> ApiResult<Json<InletOutletZone>> {
    store
        .update(|doc| -> Result<InletOutletZone, ModelError> {
            doc.inout.set_zone_shape(id, input.shape)?;
            doc.inout.zone(id).cloned()
        })
        .map_err(internal_error)?
        .map(Json)
        .map_err(model_error)
}

pub async fn save_geometry(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_geometry(&bag))
}

pub async fn save_direction(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_direction(&bag))
}

pub async fn save_rotation(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_rotation(&bag))
}

pub async fn save_policy(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_policy(&bag))
}

pub async fn save_velocity(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_velocity(&bag))
}

pub async fn save_density(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_density(&bag))
}

pub async fn save_elevation(
    State(store): State<CaseStore>,
    Path(id): Path<Uuid>,
    Json(bag): Json<FieldBag>,
) -> ApiResult<Json<InletOutletZone>> {
    edit_zone(&store, id, |zone| zone.save_elevation(&bag))
}

// ============================================================
// Case file
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveCaseResponse {
    pub path: String,
    pub saved_at: Option<DateTime<Utc>>,
}

pub async fn save_case(State(store): State<CaseStore>) -> ApiResult<Json<SaveCaseResponse>> {
    if store.path().is_none() {
        return Err((
            StatusCode::CONFLICT,
            "Case has no file to save to".to_string(),
        ));
    }
    let path = store.save().map_err(internal_error)?;
    let saved_at = store.read(|doc| doc.saved_at).map_err(internal_error)?;
    Ok(Json(SaveCaseResponse {
        path: path.display().to_string(),
        saved_at,
    }))
}
