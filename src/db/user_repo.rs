// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Account, NewUser, User},
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Cria o usuário e a conta OAuth na mesma transação.
    ///
    /// Se o e-mail já existir (dois primeiros logins simultâneos), devolve o
    /// usuário existente e não cria outra conta.
    async fn create_with_account(&self, new_user: &NewUser) -> Result<User, AppError>;
}

// O repositório de usuários, responsável pelas tabelas 'users' e 'accounts'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, image, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, image, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(maybe_user)
    }

    async fn create_with_account(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, image)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, image, created_at
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.image)
        .fetch_optional(&mut *tx)
        .await?; // Se falhar, o tx sofre rollback no drop

        let Some(user) = inserted else {
            // Outro login criou o usuário antes; o ON CONFLICT esperou o commit dele
            tx.rollback().await?;
            tracing::info!("Usuário {} criado por um login concorrente", new_user.email);

            return self.find_by_email(&new_user.email).await?.ok_or_else(|| {
                AppError::from(anyhow::anyhow!(
                    "Usuário {} não encontrado após conflito",
                    new_user.email
                ))
            });
        };

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (
                user_id, type, provider, provider_account_id,
                access_token, refresh_token, expires_at, token_type
            )
            VALUES ($1, 'oauth', $2, $3, $4, $5, $6, 'bearer')
            RETURNING
                id, user_id, type AS kind, provider, provider_account_id,
                access_token, refresh_token, expires_at, token_type
            "#,
        )
        .bind(user.id)
        .bind(&new_user.account.provider)
        .bind(&new_user.account.provider_account_id)
        .bind(new_user.account.access_token.as_deref())
        .bind(new_user.account.refresh_token.as_deref())
        .bind(new_user.account.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "👤 Usuário {} criado com conta {} ({})",
            user.id,
            account.id,
            account.provider
        );

        Ok(user)
    }
}
