// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{CustomerRepository, UserRepository},
    services::{
        auth::AuthService,
        customer_service::CustomerService,
        export_service::{ExportService, DEFAULT_FONT_FAMILY},
        identity::GoogleIdentityProvider,
        mailer::{DocumentMailer, SmtpMailer},
    },
};

/// Configuração do relay SMTP usado para enviar o PDF.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub google_client_id: String,
    pub mail: MailConfig,
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub bind_addr: String,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} deve ser definida", key))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_max_connections = or_default("DATABASE_MAX_CONNECTIONS", "5")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS deve ser um número")?;

        let smtp_port = or_default("SMTP_PORT", "465")
            .parse()
            .context("SMTP_PORT deve ser uma porta válida")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            jwt_secret: required("JWT_SECRET")?,
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            mail: MailConfig {
                host: or_default("SMTP_HOST", "smtp.resend.com"),
                port: smtp_port,
                user: required("SMTP_USER")?,
                password: required("SMTP_PASSWORD")?,
                from: or_default("MAIL_FROM", "onboarding@resend.dev"),
            },
            fonts_dir: PathBuf::from(or_default("FONTS_DIR", "./fonts")),
            font_family: or_default("FONT_FAMILY", DEFAULT_FONT_FAMILY),
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub export_service: ExportService,
    pub mailer: Arc<dyn DocumentMailer>,
}

impl AppState {
    /// Conecta ao banco, roda as migrações e monta o grafo de dependências.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let customer_repo = Arc::new(CustomerRepository::new(db_pool));
        let identity = Arc::new(GoogleIdentityProvider::new(config.google_client_id.clone()));
        let mailer = Arc::new(SmtpMailer::new(&config.mail).context("Configuração SMTP inválida")?);

        Ok(Self {
            auth_service: AuthService::new(user_repo, identity, config.jwt_secret.clone()),
            customer_service: CustomerService::new(customer_repo),
            export_service: ExportService::new(config.fonts_dir.clone(), config.font_family.clone()),
            mailer,
        })
    }
}
