// src/docs.rs

use axum::Json;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::sign_in_with_google,

        // --- Users ---
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customers,
        handlers::export::export_customers_pdf,
        handlers::export::email_customers_pdf,

        // --- Mailer ---
        handlers::mailer::send_document,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::SignInPayload,
            models::auth::AuthResponse,
            models::customer::Customer,
            handlers::customers::CustomerPayload,
            handlers::customers::UpdateCustomerPayload,
            handlers::customers::BulkDeletePayload,
            handlers::mailer::DocumentUpload,
        )
    ),
    tags(
        (name = "Auth", description = "Login via Google"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Customers", description = "Diretório de clientes do usuário"),
        (name = "Mailer", description = "Envio de documentos por e-mail")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
