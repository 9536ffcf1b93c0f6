//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, AppState};
use crate::middleware::auth::auth_guard;

/// Monta o router completo sobre um estado já construído.
pub fn app_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/openapi.json", get(docs::openapi_json))
        .route("/auth/google", post(handlers::auth::sign_in_with_google));

    // Rotas protegidas pelo token de sessão
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route(
            "/customers",
            get(handlers::customers::list_customers)
                .post(handlers::customers::create_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customers),
        )
        .route("/customers/export", get(handlers::export::export_customers_pdf))
        .route("/customers/export/email", post(handlers::export::email_customers_pdf))
        .route("/mailer", post(handlers::mailer::send_document))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;

    // Se a configuração ou o banco falharem, a aplicação não inicia
    let app_state = AppState::new(&config).await?;

    let app = app_router(app_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
