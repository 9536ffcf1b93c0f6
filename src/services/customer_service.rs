// src/services/customer_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerStore,
    models::customer::{
        parse_status_param, Customer, CustomerFields, CustomerFilter, CustomerQuery, ListParams,
        SortDirection, SortField,
    },
};

/// O diretório de clientes. Toda operação é escopada pelo dono.
#[derive(Clone)]
pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        Self { store }
    }

    /// Traduz os parâmetros brutos em filtro + ordenação.
    pub fn build_query(&self, owner_id: Uuid, params: &ListParams) -> Result<CustomerQuery, AppError> {
        // `?sortBy=` vazio vale como ausente
        let sort_field = match params.sort_by.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SortField>()?,
            None => SortField::default(),
        };

        let filter = CustomerFilter::match_all()
            .owned_by(owner_id)
            .with_status(parse_status_param(params.status.as_deref()))
            .matching(params.search.as_deref());

        Ok(CustomerQuery {
            filter,
            sort_field,
            sort_direction: SortDirection::from_param(params.sort_direction.as_deref()),
        })
    }

    pub async fn list(&self, owner_id: Uuid, params: &ListParams) -> Result<Vec<Customer>, AppError> {
        let query = self.build_query(owner_id, params)?;
        let customers = self.store.list(&query).await?;

        tracing::debug!("📋 {} clientes listados para {}", customers.len(), owner_id);
        Ok(customers)
    }

    pub async fn create(&self, owner_id: Uuid, fields: CustomerFields) -> Result<Customer, AppError> {
        // Sem validação de formato aqui: o contrato aceita os campos como vierem
        self.store.create(owner_id, &fields).await
    }

    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: CustomerFields,
    ) -> Result<Customer, AppError> {
        self.store
            .update(owner_id, id, &fields)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        match self.store.delete(owner_id, id).await? {
            0 => Err(AppError::NothingDeleted(id)),
            _ => Ok(()),
        }
    }

    pub async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        let removed = self.store.delete_many(owner_id, ids).await?;

        tracing::info!("🗑️ {} de {} clientes removidos", removed, ids.len());
        Ok(removed)
    }
}
