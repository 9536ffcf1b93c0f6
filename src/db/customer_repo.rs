// src/db/customer_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerFields, CustomerQuery},
};

const CUSTOMER_COLUMNS: &str = "id, user_id, name, email, phone, status, created_at";

/// Operações do diretório sobre o armazenamento.
/// Cada método corresponde a um único comando SQL.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, AppError>;

    async fn create(&self, owner_id: Uuid, fields: &CustomerFields) -> Result<Customer, AppError>;

    /// `None` quando o id não existe (ou pertence a outro usuário).
    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, AppError>;

    /// Retorna quantas linhas foram removidas.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<u64, AppError>;

    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError>;
}

// O repositório de clientes, responsável pela tabela 'customers'
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapa os curingas do LIKE para que a busca seja literal.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Monta o SELECT da listagem. Só entram os predicados presentes no filtro;
/// a coluna de ordenação vem de `SortField`, nunca do texto do usuário.
pub(crate) fn build_list_query(query: &CustomerQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder =
        QueryBuilder::new(format!("SELECT {} FROM customers WHERE TRUE", CUSTOMER_COLUMNS));

    if let Some(owner_id) = query.filter.owner_id() {
        builder.push(" AND user_id = ").push_bind(owner_id);
    }

    if let Some(status) = query.filter.status() {
        builder.push(" AND status = ").push_bind(status);
    }

    if let Some(search) = query.filter.search() {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR phone ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    builder
        .push(" ORDER BY ")
        .push(query.sort_field.column())
        .push(" ")
        .push(query.sort_direction.as_sql());

    builder
}

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, AppError> {
        let mut builder = build_list_query(query);

        let customers = builder
            .build_query_as::<Customer>()
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    async fn create(&self, owner_id: Uuid, fields: &CustomerFields) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (user_id, name, email, phone, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(owner_id)
        .bind(fields.name.as_deref())
        .bind(fields.email.as_deref())
        .bind(fields.phone.as_deref())
        .bind(fields.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $1, email = $2, phone = $3, status = $4
            WHERE id = $5 AND user_id = $6
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(fields.name.as_deref())
        .bind(fields.email.as_deref())
        .bind(fields.phone.as_deref())
        .bind(fields.status)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_many(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<u64, AppError> {
        // Remoção por pertinência ao conjunto: ids ausentes são ignorados
        let result = sqlx::query("DELETE FROM customers WHERE user_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
