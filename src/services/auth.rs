// src/services/auth.rs

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{Claims, NewAccount, NewUser, SignInPayload, User},
    services::identity::IdentityProvider,
};

const SESSION_DAYS: i64 = 7;
const DEFAULT_USER_NAME: &str = "Unnamed User";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    identity: Arc<dyn IdentityProvider>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        identity: Arc<dyn IdentityProvider>,
        jwt_secret: String,
    ) -> Self {
        Self { users, identity, jwt_secret }
    }

    /// Login via provedor: verifica a credencial, cria o usuário no primeiro
    /// acesso (com a conta OAuth) e emite o token de sessão.
    pub async fn sign_in(&self, payload: &SignInPayload) -> Result<(String, User), AppError> {
        let identity = self
            .identity
            .authenticate(&payload.id_token)
            .await?
            .ok_or(AppError::IdentityRejected)?;

        let user = match self.users.find_by_email(&identity.email).await? {
            Some(existing) => existing,
            None => {
                let new_user = NewUser {
                    name: identity
                        .name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
                    email: identity.email,
                    image: identity.image.unwrap_or_default(),
                    account: NewAccount {
                        provider: identity.provider,
                        provider_account_id: identity.provider_account_id,
                        access_token: payload.access_token.clone(),
                        refresh_token: payload.refresh_token.clone(),
                        expires_at: identity.expires_at,
                    },
                };

                // Um login concorrente pode ter criado o usuário entre a busca e
                // o insert; nesse caso o store devolve o existente
                let user = self.users.create_with_account(&new_user).await?;
                tracing::info!("✅ Primeiro acesso de {}", user.email);
                user
            }
        };

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Token válido de um usuário que não existe mais também é rejeitado
        self.users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_DAYS);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
