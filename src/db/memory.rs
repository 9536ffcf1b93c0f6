// src/db/memory.rs
//
// Implementações em memória dos stores, usadas pelos testes.
// Reproduzem a semântica do SQL (ILIKE, NULLs por último no ASC). A ordenação
// de texto aproxima a collation do banco (en_US) comparando sem caixa.

use std::{cmp::Ordering, sync::Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerStore, UserStore},
    models::{
        auth::{Account, NewUser, User},
        customer::{Customer, CustomerFields, CustomerFilter, CustomerQuery, SortDirection, SortField},
    },
};

#[derive(Default)]
pub struct InMemoryCustomerStore {
    rows: Mutex<Vec<Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere um registro pronto (com data controlada pelo teste).
    pub fn seed(
        &self,
        owner_id: Uuid,
        name: &str,
        email: &str,
        phone: &str,
        status: bool,
        created_at: DateTime<Utc>,
    ) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            user_id: owner_id,
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            status,
            created_at,
        };
        self.rows.lock().unwrap().push(customer.clone());
        customer
    }

    pub fn all(&self) -> Vec<Customer> {
        self.rows.lock().unwrap().clone()
    }
}

fn contains_insensitive(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

fn matches(filter: &CustomerFilter, customer: &Customer) -> bool {
    filter.owner_id().is_none_or(|owner| customer.user_id == owner)
        && filter.status().is_none_or(|status| customer.status == status)
        && filter.search().is_none_or(|search| {
            contains_insensitive(&customer.name, search)
                || contains_insensitive(&customer.email, search)
                || contains_insensitive(&customer.phone, search)
        })
}

// Postgres trata NULL como maior que qualquer valor
fn cmp_nullable(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}

fn compare(field: SortField, a: &Customer, b: &Customer) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => cmp_nullable(&a.name, &b.name),
        SortField::Email => cmp_nullable(&a.email, &b.email),
        SortField::Phone => cmp_nullable(&a.phone, &b.phone),
        SortField::Status => a.status.cmp(&b.status),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, AppError> {
        let mut customers: Vec<Customer> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches(&query.filter, c))
            .cloned()
            .collect();

        customers.sort_by(|a, b| {
            let ordering = compare(query.sort_field, a, b);
            match query.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(customers)
    }

    async fn create(&self, owner_id: Uuid, fields: &CustomerFields) -> Result<Customer, AppError> {
        let customer = Customer {
            id: Uuid::new_v4(),
            user_id: owner_id,
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            status: fields.status,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(customer) = rows.iter_mut().find(|c| c.id == id && c.user_id == owner_id) else {
            return Ok(None);
        };

        customer.name = fields.name.clone();
        customer.email = fields.email.clone();
        customer.phone = fields.phone.clone();
        customer.status = fields.status;

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| !(c.id == id && c.user_id == owner_id));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| !(c.user_id == owner_id && ids.contains(&c.id)));
        Ok((before - rows.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: Some("Test User".to_string()),
            email: email.to_string(),
            image: None,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create_with_account(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.email == new_user.email) {
            return Ok(existing.clone());
        }

        let user = User {
            id: Uuid::new_v4(),
            name: Some(new_user.name.clone()),
            email: new_user.email.clone(),
            image: Some(new_user.image.clone()),
            created_at: Utc::now(),
        };
        let account = Account {
            id: Uuid::new_v4(),
            user_id: user.id,
            kind: "oauth".to_string(),
            provider: new_user.account.provider.clone(),
            provider_account_id: new_user.account.provider_account_id.clone(),
            access_token: new_user.account.access_token.clone(),
            refresh_token: new_user.account.refresh_token.clone(),
            expires_at: new_user.account.expires_at,
            token_type: Some("bearer".to_string()),
        };

        users.push(user.clone());
        self.accounts.lock().unwrap().push(account);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn text_sort_ignores_case_and_keeps_nulls_last() {
        let store = InMemoryCustomerStore::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        store.seed(owner, "caio", "", "", true, now);
        store.seed(owner, "Bia", "", "", true, now);
        store.seed(owner, "ana", "", "", true, now);
        store.create(owner, &CustomerFields::default()).await.unwrap();

        let query = CustomerQuery {
            filter: CustomerFilter::match_all(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Asc,
        };
        let names: Vec<Option<String>> = store
            .list(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec![Some("ana".into()), Some("Bia".into()), Some("caio".into()), None]
        );
    }
}
