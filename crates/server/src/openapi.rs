use std::collections::BTreeMap;

use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct UserDoc { pub username: String }

#[derive(ToSchema)]
pub struct LoginResponseDoc { pub message: String, pub user: UserDoc }

#[derive(ToSchema)]
pub struct MeResponseDoc { pub authenticated: bool, pub user: Option<UserDoc> }

#[derive(ToSchema, Serialize)]
pub struct BlockDoc {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDoc {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub emphasis: String,
    pub order_index: i32,
}

#[derive(ToSchema)]
pub struct ContentSnapshotDoc {
    pub blocks: BTreeMap<String, BlockDoc>,
    pub services: Vec<ServiceDoc>,
    pub settings: BTreeMap<String, String>,
}

/// `{"updates": {key: value}}`; every value must be a string.
#[derive(ToSchema)]
pub struct UpdatesRequest { pub updates: BTreeMap<String, String> }

#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub title: String,
    pub description: String,
    pub emphasis: Option<String>,
    pub order_index: Option<i32>,
}

#[derive(ToSchema)]
pub struct BlocksResponseDoc { pub message: String, pub blocks: BTreeMap<String, BlockDoc> }

#[derive(ToSchema)]
pub struct SettingsResponseDoc { pub message: String, pub settings: BTreeMap<String, String> }

#[derive(ToSchema)]
pub struct ServiceResponseDoc { pub message: String, pub service: Option<ServiceDoc> }

#[derive(ToSchema)]
pub struct DeletedResponseDoc { pub message: String, pub id: i32 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::content::get_content,
        crate::routes::content::update_blocks,
        crate::routes::content::create_service,
        crate::routes::content::update_service,
        crate::routes::content::delete_service,
        crate::routes::content::update_settings,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            LoginRequest,
            UserDoc,
            LoginResponseDoc,
            MeResponseDoc,
            BlockDoc,
            ServiceDoc,
            ContentSnapshotDoc,
            UpdatesRequest,
            ServiceRequest,
            BlocksResponseDoc,
            SettingsResponseDoc,
            ServiceResponseDoc,
            DeletedResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth", description = "Administrator session"),
        (name = "content", description = "Page content, services and settings"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
