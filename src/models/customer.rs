// src/models/customer.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::error::AppError;

// --- CLIENTE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    // Dono do registro (nunca muda depois da criação)
    pub user_id: Uuid,

    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,

    pub status: bool,
    pub created_at: DateTime<Utc>,
}

/// Os quatro campos mutáveis de um cliente.
/// O update substitui todos de uma vez, sem merge parcial.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: bool,
}

// --- ORDENAÇÃO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Name,
    Email,
    Phone,
    Status,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Nome da coluna no banco. Só valores desta lista chegam ao SQL.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::Status => "status",
            SortField::CreatedAt => "created_at",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    // Aceita os nomes do contrato HTTP (camelCase)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "phone" => Ok(SortField::Phone),
            "status" => Ok(SortField::Status),
            "createdAt" => Ok(SortField::CreatedAt),
            other => Err(AppError::InvalidSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Só "desc" inverte a ordem; qualquer outro valor (ou ausência) é ascendente.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

// --- FILTRO ---

/// Filtro conjuntivo (AND) do diretório.
///
/// Começa em "tudo" e cada predicado só é aplicado quando a entrada
/// correspondente existe. Sem dono, a consulta cobre todos os usuários;
/// o `CustomerService` sempre informa o dono.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
    owner_id: Option<Uuid>,
    status: Option<bool>,
    search: Option<String>,
}

impl CustomerFilter {
    pub fn match_all() -> Self {
        Self::default()
    }

    pub fn owned_by(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_status(mut self, status: Option<bool>) -> Self {
        self.status = status;
        self
    }

    /// Busca textual em nome, e-mail ou telefone. Texto vazio não filtra.
    pub fn matching(mut self, search: Option<&str>) -> Self {
        self.search = search.filter(|s| !s.is_empty()).map(str::to_owned);
        self
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner_id
    }

    pub fn status(&self) -> Option<bool> {
        self.status
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Converte o parâmetro bruto `status` da query string.
///
/// Ausente ou a string literal "null" => sem filtro.
/// Qualquer outro valor => `raw == "true"`.
pub fn parse_status_param(raw: Option<&str>) -> Option<bool> {
    match raw {
        None | Some("null") => None,
        Some(value) => Some(value == "true"),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerQuery {
    pub filter: CustomerFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

/// Desserializa um parâmetro de query opcional tratando `?campo=` como ausente.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Parâmetros brutos da listagem, como chegam na query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Se informado, precisa ser o usuário da sessão.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<Uuid>,
    pub search: Option<String>,
    /// id | name | email | phone | status | createdAt (vazio = createdAt)
    pub sort_by: Option<String>,
    /// "desc" ou "asc" (padrão)
    pub sort_direction: Option<String>,
    /// "true", "false" ou "null" (sem filtro)
    pub status: Option<String>,
}
