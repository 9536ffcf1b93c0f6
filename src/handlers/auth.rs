// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, SignInPayload, User},
};

// POST /api/auth/google
#[utoipa::path(
    post,
    path = "/api/auth/google",
    tag = "Auth",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Sessão criada", body = AuthResponse),
        (status = 400, description = "ID token ausente"),
        (status = 401, description = "Credencial recusada pelo provedor")
    )
)]
pub async fn sign_in_with_google(
    State(app_state): State<AppState>,
    Json(payload): Json<SignInPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let (token, user) = app_state.auth_service.sign_in(&payload).await?;

    Ok(Json(AuthResponse { token, user }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário da sessão", body = User),
        (status = 401, description = "Não autorizado")
    ),
    security(("session_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
