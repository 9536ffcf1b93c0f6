// src/test_support.rs
//
// Colaboradores falsos e um app completo em memória para os testes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use tower::ServiceExt;

use crate::{
    app_router,
    common::error::AppError,
    config::AppState,
    db::memory::{InMemoryCustomerStore, InMemoryUserStore},
    models::auth::{User, UserIdentity},
    services::{
        auth::AuthService,
        customer_service::CustomerService,
        export_service::{ExportService, DEFAULT_FONT_FAMILY},
        identity::IdentityProvider,
        mailer::DocumentMailer,
    },
};

/// Aceita um único token fixo.
pub struct StaticIdentityProvider {
    accepted: Option<(String, UserIdentity)>,
}

impl StaticIdentityProvider {
    pub fn with_identity(token: &str, email: &str) -> Self {
        Self {
            accepted: Some((
                token.to_string(),
                UserIdentity {
                    provider: "google".into(),
                    provider_account_id: format!("sub-{}", email),
                    email: email.to_string(),
                    name: Some("Ana".into()),
                    image: None,
                    expires_at: Some(1_700_000_000),
                },
            )),
        }
    }

    pub fn rejecting() -> Self {
        Self { accepted: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn authenticate(&self, id_token: &str) -> Result<Option<UserIdentity>, AppError> {
        Ok(self
            .accepted
            .as_ref()
            .filter(|(token, _)| token == id_token)
            .map(|(_, identity)| identity.clone()))
    }
}

/// Guarda os envios em vez de falar com um relay SMTP.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(Vec<u8>, String)>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(Vec<u8>, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentMailer for RecordingMailer {
    async fn deliver_document(&self, document: Vec<u8>, recipient: &str) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::MailDelivery("relay indisponível".into()));
        }
        self.sent.lock().unwrap().push((document, recipient.to_string()));
        Ok(())
    }
}

pub const SIGN_IN_TOKEN: &str = "google-id-token";

// DejaVu Sans com os nomes que o genpdf procura
pub const FIXTURE_FONTS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fonts");
pub const FIXTURE_FONT_FAMILY: &str = "DejaVuSans";

pub struct TestApp {
    pub router: Router,
    pub customers: Arc<InMemoryCustomerStore>,
    pub users: Arc<InMemoryUserStore>,
    pub mailer: Arc<RecordingMailer>,
    pub auth_service: AuthService,
    pub user: User,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_mailer(RecordingMailer::default())
    }

    /// Exportação funcional, com as fontes de `tests/fixtures/fonts`.
    pub fn with_fonts() -> Self {
        Self::build(
            RecordingMailer::default(),
            ExportService::new(FIXTURE_FONTS_DIR, FIXTURE_FONT_FAMILY),
        )
    }

    // Sem fontes: toda exportação falha na renderização
    pub fn with_mailer(mailer: RecordingMailer) -> Self {
        Self::build(mailer, ExportService::new("./does-not-exist", DEFAULT_FONT_FAMILY))
    }

    fn build(mailer: RecordingMailer, export_service: ExportService) -> Self {
        let customers = Arc::new(InMemoryCustomerStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let mailer = Arc::new(mailer);
        let identity = Arc::new(StaticIdentityProvider::with_identity(SIGN_IN_TOKEN, "new@gmail.com"));
        let auth_service = AuthService::new(users.clone(), identity, "test-secret".to_string());

        let app_state = AppState {
            auth_service: auth_service.clone(),
            customer_service: CustomerService::new(customers.clone()),
            export_service,
            mailer: mailer.clone(),
        };

        let user = users.insert_user("me@x.com");
        let token = auth_service.create_token(&user).unwrap();

        Self {
            router: app_router(app_state),
            customers,
            users,
            mailer,
            auth_service,
            user,
            token,
        }
    }

    /// Um segundo usuário com sessão própria.
    pub fn other_session(&self, email: &str) -> (User, String) {
        let user = self.users.insert_user(email);
        let token = self.auth_service.create_token(&user).unwrap();
        (user, token)
    }

    pub fn authed(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
