// src/services/identity.rs

use async_trait::async_trait;
use serde::Deserialize;

use crate::{common::error::AppError, models::auth::UserIdentity};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifica uma credencial no provedor externo.
/// `Ok(None)` significa que o provedor recusou a credencial.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, id_token: &str) -> Result<Option<UserIdentity>, AppError>;
}

#[derive(Clone)]
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleIdentityProvider {
    pub fn new(client_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
        }
    }
}

// Resposta do endpoint tokeninfo (todos os valores chegam como string)
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    exp: Option<String>,
}

impl TokenInfo {
    fn into_identity(self, client_id: &str) -> Option<UserIdentity> {
        if self.aud != client_id {
            tracing::warn!("⚠️ ID token emitido para outro cliente: {}", self.aud);
            return None;
        }

        if self.email_verified.as_deref() != Some("true") {
            return None;
        }

        let email = self.email.filter(|e| !e.is_empty())?;

        Some(UserIdentity {
            provider: "google".to_string(),
            provider_account_id: self.sub,
            email,
            name: self.name,
            image: self.picture,
            expires_at: self.exp.and_then(|exp| exp.parse().ok()),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn authenticate(&self, id_token: &str) -> Result<Option<UserIdentity>, AppError> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("⚠️ Google recusou o ID token ({})", response.status());
            return Ok(None);
        }

        let info: TokenInfo = response.json().await?;
        Ok(info.into_identity(&self.client_id))
    }
}
