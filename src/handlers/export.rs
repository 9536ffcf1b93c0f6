// src/handlers/export.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::customer::ListParams,
    services::mailer::ATTACHMENT_NAME,
};

/// Renderiza a mesma visão que a listagem devolveria para estes parâmetros.
async fn render_table_view(
    app_state: &AppState,
    user: &AuthenticatedUser,
    params: &ListParams,
) -> Result<Vec<u8>, AppError> {
    let owner_id = user.owner_scope(params.user_id)?;
    let customers = app_state.customer_service.list(owner_id, params).await?;

    app_state.export_service.render_customers(customers).await
}

// GET /api/customers/export
#[utoipa::path(
    get,
    path = "/api/customers/export",
    tag = "Customers",
    params(ListParams),
    responses(
        (status = 200, description = "PDF da tabela atual (application/pdf)"),
        (status = 400, description = "Campo de ordenação inválido")
    ),
    security(("session_jwt" = []))
)]
pub async fn export_customers_pdf(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListParams>,
) -> Result<Response, AppError> {
    let pdf_bytes = render_table_view(&app_state, &user, &params).await?;

    // Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ATTACHMENT_NAME),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}

// POST /api/customers/export/email
#[utoipa::path(
    post,
    path = "/api/customers/export/email",
    tag = "Customers",
    params(ListParams),
    responses(
        (status = 201, description = "PDF enviado para o e-mail do usuário"),
        (status = 500, description = "Falha ao gerar ou enviar")
    ),
    security(("session_jwt" = []))
)]
pub async fn email_customers_pdf(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListParams>,
) -> Result<StatusCode, AppError> {
    let pdf_bytes = render_table_view(&app_state, &user, &params).await?;

    app_state
        .mailer
        .deliver_document(pdf_bytes, &user.0.email)
        .await?;

    Ok(StatusCode::CREATED)
}
