// src/handlers/customers.rs

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::customer::{empty_as_none, Customer, CustomerFields, ListParams},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OwnerParams {
    /// Se informado, precisa ser o usuário da sessão.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    /// Remoção simples; sem ele (ou vazio), o corpo `{ids}` é usado.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<Uuid>,
}

// Sem validação de formato: o contrato aceita os campos como vierem
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[schema(example = "Maria da Silva")]
    pub name: Option<String>,
    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    #[schema(example = "1234567890")]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: bool,
}

impl From<CustomerPayload> for CustomerFields {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            status: payload.status,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkDeletePayload {
    pub ids: Vec<Uuid>,
}

// O front envia `JSON.stringify(..)` sem Content-Type (text/plain), então o
// corpo é lido cru em vez de passar pelo extractor `Json`.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    params(ListParams),
    responses(
        (status = 200, description = "Clientes do usuário", body = Vec<Customer>),
        (status = 400, description = "Campo de ordenação inválido"),
        (status = 403, description = "userId diferente do usuário da sessão")
    ),
    security(("session_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = user.owner_scope(params.user_id)?;

    let customers = app_state.customer_service.list(owner_id, &params).await?;

    Ok((StatusCode::OK, Json(customers)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    params(OwnerParams),
    request_body = CustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Customer),
        (status = 403, description = "userId diferente do usuário da sessão"),
        (status = 500, description = "Corpo ilegível ou falha no banco")
    ),
    security(("session_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(params): Query<OwnerParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let owner_id = user.owner_scope(params.user_id)?;
    let payload: CustomerPayload =
        parse_body(&body).map_err(|e| AppError::UnreadableBody(e.to_string()))?;

    let customer = app_state
        .customer_service
        .create(owner_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers
#[utoipa::path(
    put,
    path = "/api/customers",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Customer not found (inclui corpo ilegível)")
    ),
    security(("session_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    // Qualquer falha no PUT responde "Customer not found"
    let payload: UpdateCustomerPayload = parse_body(&body).map_err(|e| {
        tracing::warn!("Corpo do update ilegível: {}", e);
        AppError::CustomerNotFound
    })?;

    let fields = CustomerFields {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        status: payload.status,
    };

    let customer = app_state
        .customer_service
        .update(user.id, payload.id, fields)
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers?id=  |  DELETE /api/customers {ids}
#[utoipa::path(
    delete,
    path = "/api/customers",
    tag = "Customers",
    params(DeleteParams),
    request_body(content = BulkDeletePayload, description = "Usado quando `id` não é informado"),
    responses(
        (status = 200, description = "Confirmação em texto"),
        (status = 500, description = "Falha na remoção")
    ),
    security(("session_jwt" = []))
)]
pub async fn delete_customers(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<DeleteParams>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    if let Some(id) = params.id {
        app_state.customer_service.delete(user.id, id).await?;
        return Ok((StatusCode::OK, "Customer deleted successfully"));
    }

    let payload: BulkDeletePayload =
        parse_body(&body).map_err(|e| AppError::MalformedBody(e.to_string()))?;

    app_state
        .customer_service
        .delete_many(user.id, &payload.ids)
        .await?;

    Ok((StatusCode::OK, "Customers deleted successfully"))
}
