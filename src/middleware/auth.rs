// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::User};

// O middleware em si: exige "Authorization: Bearer <token>"
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    /// Resolve o dono das operações do diretório.
    ///
    /// O dono é sempre o usuário da sessão; um `userId` explícito só é
    /// aceito se for o mesmo.
    pub fn owner_scope(&self, requested: Option<Uuid>) -> Result<Uuid, AppError> {
        match requested {
            Some(id) if id != self.0.id => {
                tracing::warn!("⛔ Usuário {} tentou acessar o diretório de {}", self.0.id, id);
                Err(AppError::OwnerMismatch)
            }
            _ => Ok(self.0.id),
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
