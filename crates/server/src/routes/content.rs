use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use service::auth::domain::Authenticated;
use service::content::domain::{BlockMap, ContentSnapshot, ServiceInput, ServiceRecord, SettingMap};

use crate::errors::ApiError;
use crate::state::ServerState;

/// Body of the batch upsert endpoints. Values must all be strings.
#[derive(Debug, Deserialize)]
pub struct UpdatesBody {
    pub updates: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlocksResponse {
    pub message: String,
    pub blocks: BlockMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub message: String,
    pub settings: SettingMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub message: String,
    pub service: Option<ServiceRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
    pub id: i32,
}

#[utoipa::path(
    get, path = "/content", tag = "content",
    responses(
        (status = 200, description = "Blocks, services and settings", body = crate::openapi::ContentSnapshotDoc),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_content(State(state): State<ServerState>) -> Result<Json<ContentSnapshot>, ApiError> {
    let snapshot = state
        .content
        .get_snapshot()
        .await
        .map_err(ApiError::content("Failed to retrieve content"))?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    put, path = "/content/blocks", tag = "content",
    request_body = crate::openapi::UpdatesRequest,
    responses(
        (status = 200, description = "Updated block mapping", body = crate::openapi::BlocksResponseDoc),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "No session"),
        (status = 500, description = "Storage failure, nothing applied")
    )
)]
pub async fn update_blocks(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    body: Result<Json<UpdatesBody>, JsonRejection>,
) -> Result<Json<BlocksResponse>, ApiError> {
    let Json(body) = body?;
    let blocks = state
        .content
        .upsert_blocks(&auth, body.updates)
        .await
        .map_err(ApiError::content("Failed to update content blocks"))?;
    Ok(Json(BlocksResponse { message: "Content updated".into(), blocks }))
}

#[utoipa::path(
    post, path = "/content/services", tag = "content",
    request_body = crate::openapi::ServiceRequest,
    responses(
        (status = 201, description = "Created service", body = crate::openapi::ServiceResponseDoc),
        (status = 400, description = "Title and description are required"),
        (status = 401, description = "No session"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_service(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    body: Result<Json<ServiceInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceResponse>), ApiError> {
    let Json(input) = body?;
    let service = state
        .content
        .create_service(&auth, input)
        .await
        .map_err(ApiError::content("Failed to create service"))?;
    Ok((StatusCode::CREATED, Json(ServiceResponse { message: "Service created".into(), service: Some(service) })))
}

/// An unknown id is not an error: nothing changes and `service` is `null`.
#[utoipa::path(
    put, path = "/content/services/{id}", tag = "content",
    params(("id" = i32, Path, description = "Service id")),
    request_body = crate::openapi::ServiceRequest,
    responses(
        (status = 200, description = "Re-read service, null when absent", body = crate::openapi::ServiceResponseDoc),
        (status = 400, description = "Title and description are required"),
        (status = 401, description = "No session"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn update_service(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ServiceInput>, JsonRejection>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let Path(id) = id?;
    let Json(input) = body?;
    let service = state
        .content
        .update_service(&auth, id, input)
        .await
        .map_err(ApiError::content("Failed to update service"))?;
    Ok(Json(ServiceResponse { message: "Service updated".into(), service }))
}

#[utoipa::path(
    delete, path = "/content/services/{id}", tag = "content",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Echoes the id, present or not", body = crate::openapi::DeletedResponseDoc),
        (status = 401, description = "No session"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_service(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = id?;
    let id = state
        .content
        .delete_service(&auth, id)
        .await
        .map_err(ApiError::content("Failed to delete service"))?;
    Ok(Json(DeletedResponse { message: "Service removed".into(), id }))
}

#[utoipa::path(
    put, path = "/content/settings", tag = "content",
    request_body = crate::openapi::UpdatesRequest,
    responses(
        (status = 200, description = "Updated settings mapping", body = crate::openapi::SettingsResponseDoc),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "No session"),
        (status = 500, description = "Storage failure, nothing applied")
    )
)]
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    body: Result<Json<UpdatesBody>, JsonRejection>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let Json(body) = body?;
    let settings = state
        .content
        .upsert_settings(&auth, body.updates)
        .await
        .map_err(ApiError::content("Failed to update settings"))?;
    Ok(Json(SettingsResponse { message: "Settings updated".into(), settings }))
}
