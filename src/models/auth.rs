// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Credencial OAuth gravada junto com o usuário no primeiro login
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub provider: String,
    pub provider_account_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
    pub token_type: Option<String>,
}

/// Identidade já verificada pelo provedor.
#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub provider: String,
    pub provider_account_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub expires_at: Option<i64>,
}

/// Dados do usuário + conta criados no primeiro login.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub image: String,
    pub account: NewAccount,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub provider: String,
    pub provider_account_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

// Dados para login com Google
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInPayload {
    #[validate(length(min = 1, message = "required"))]
    pub id_token: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

// Resposta de autenticação com o token de sessão
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // Subject (ID do usuário)
    pub email: String,
    pub exp: usize,    // Expiration time
    pub iat: usize,    // Issued At
}
