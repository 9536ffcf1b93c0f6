use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    MalformedBody(String),

    // Sem mapeamento próprio: o create responde 500 como qualquer falha
    #[error("Corpo da requisição ilegível: {0}")]
    UnreadableBody(String),

    #[error("Campo de ordenação inválido: {0}")]
    InvalidSortField(String),

    #[error("Token inválido")]
    InvalidToken,

    // O provedor de identidade recusou a credencial
    #[error("Credencial recusada pelo provedor de identidade")]
    IdentityRejected,

    #[error("Acesso negado ao diretório de outro usuário")]
    OwnerMismatch,

    #[error("Cliente não encontrado")]
    CustomerNotFound,

    // O original não distingue "não existe" de outras falhas no delete simples
    #[error("Nenhum cliente removido para o id {0}")]
    NothingDeleted(Uuid),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Falha no provedor de identidade: {0}")]
    IdentityProviderError(#[from] reqwest::Error),

    #[error("Falha no envio do e-mail: {0}")]
    MailDelivery(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar o PDF: {0}")]
    PdfRender(String),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidSortField(field) => {
                return (
                    StatusCode::BAD_REQUEST,
                    format!("Cannot sort customers by '{}'", field),
                )
                    .into_response();
            }
            AppError::MalformedBody(ref reason) => {
                tracing::warn!("Corpo inválido: {}", reason);
                (StatusCode::BAD_REQUEST, "Bad Request")
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::IdentityRejected => (StatusCode::UNAUTHORIZED, "Sign-in rejected"),
            AppError::OwnerMismatch => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "Customer not found"),

            // Todo o resto vira 500; a causa só vai para o log.
            ref e => {
                tracing::error!("🔥 Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, error_message).into_response()
    }
}
