use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

use common::types::Message;
use service::auth::domain::{AuthUser, Authenticated, LoginInput};
use service::auth::errors::AuthError;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AuthUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

fn session_token(state: &ServerState, jar: &CookieJar) -> Option<String> {
    jar.get(&state.cookie.name).map(|c| c.value().to_string())
}

/// Gate for mutating routes: resolves the session cookie into an
/// [`Authenticated`] proof and hands it to the handler as an extension.
pub async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(&state, &jar);
    let proof = match state.auth.authorize(token.as_deref()).await {
        Ok(proof) => proof,
        Err(AuthError::Unauthorized) => {
            warn!(event = "unauthorized", path = %req.uri().path(), method = %req.method(), "rejected mutation without session");
            return Err(ApiError::Unauthorized);
        }
        Err(e) => {
            return Err(ApiError::Session { message: "Failed to load session", detail: e.to_string() });
        }
    };
    req.extensions_mut().insert(proof);
    Ok(next.run(req).await)
}

#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = crate::openapi::LoginResponseDoc),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(input) = body?;
    let previous = session_token(&state, &jar);
    let session = state.auth.login(input).await?;

    // A fresh login replaces whatever session the client carried.
    if let Some(prev) = previous {
        if let Err(e) = state.auth.logout(&prev).await {
            warn!(event = "stale_session_cleanup_failed", error = %e, "previous session not removed");
        }
    }

    let jar = jar.add(state.cookie.session_cookie(session.token));
    Ok((jar, Json(LoginResponse { message: "Authenticated".into(), user: session.user })))
}

#[utoipa::path(
    post, path = "/auth/logout", tag = "auth",
    responses(
        (status = 200, description = "Session closed", body = crate::openapi::MessageDoc),
        (status = 401, description = "No session"),
        (status = 500, description = "Session store failure")
    )
)]
pub async fn logout(
    State(state): State<ServerState>,
    Extension(auth): Extension<Authenticated>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Message>), ApiError> {
    let token = session_token(&state, &jar).ok_or(ApiError::Unauthorized)?;
    state.auth.logout(&token).await?;
    tracing::info!(event = "logout", user = auth.username(), "logged out");
    Ok((jar.remove(state.cookie.removal_cookie()), Json(Message::new("Logged out"))))
}

#[utoipa::path(
    get, path = "/auth/me", tag = "auth",
    responses(
        (status = 200, description = "Current identity", body = crate::openapi::MeResponseDoc)
    )
)]
pub async fn me(State(state): State<ServerState>, jar: CookieJar) -> Json<MeResponse> {
    let user = state.auth.current_user(session_token(&state, &jar).as_deref()).await;
    Json(MeResponse { authenticated: user.is_some(), user })
}
