// src/handlers/mailer.rs

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MailerParams {
    /// Destinatário; padrão é o e-mail do usuário da sessão.
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
}

// Só para a documentação do corpo multipart
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DocumentUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

// POST /api/mailer
#[utoipa::path(
    post,
    path = "/api/mailer",
    tag = "Mailer",
    params(MailerParams),
    request_body(content = DocumentUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "E-mail enviado"),
        (status = 200, description = "{\"success\": false} quando não há arquivo"),
        (status = 400, description = "E-mail inválido"),
        (status = 500, description = "Falha no relay SMTP")
    ),
    security(("session_jwt" = []))
)]
pub async fn send_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<MailerParams>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    params.validate()?;

    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::MalformedBody(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::MalformedBody(e.to_string()))?;
            document = Some(bytes);
            break;
        }
    }

    let Some(document) = document else {
        return Ok((StatusCode::OK, Json(json!({ "success": false }))).into_response());
    };

    let recipient = params.email.unwrap_or(user.email);
    app_state
        .mailer
        .deliver_document(document.to_vec(), &recipient)
        .await?;

    Ok(StatusCode::CREATED.into_response())
}
