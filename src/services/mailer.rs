// src/services/mailer.rs

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{common::error::AppError, config::MailConfig};

pub const MAIL_SUBJECT: &str = "Customer User Data";
pub const MAIL_BODY: &str = "Customer User Data";
pub const ATTACHMENT_NAME: &str = "CustomerData.pdf";

/// Entrega um documento por e-mail. Uma única tentativa, sem fila.
#[async_trait]
pub trait DocumentMailer: Send + Sync {
    async fn deliver_document(&self, document: Vec<u8>, recipient: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        // relay() usa TLS implícito (porta 465 por padrão)
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.password.clone()))
            .build();

        let from = config.from.parse::<Mailbox>()?;

        Ok(Self { transport, from })
    }
}

fn build_message(from: Mailbox, recipient: &str, document: Vec<u8>) -> Result<Message, AppError> {
    let to = recipient
        .parse::<Mailbox>()
        .map_err(|e| AppError::MailDelivery(format!("destinatário inválido '{}': {}", recipient, e)))?;

    let content_type = ContentType::parse("application/pdf")
        .map_err(|e| AppError::MailDelivery(e.to_string()))?;

    let attachment = Attachment::new(ATTACHMENT_NAME.to_string()).body(document, content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(MAIL_SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(MAIL_BODY.to_string()))
                .singlepart(attachment),
        )
        .map_err(|e| AppError::MailDelivery(e.to_string()))
}

#[async_trait]
impl DocumentMailer for SmtpMailer {
    async fn deliver_document(&self, document: Vec<u8>, recipient: &str) -> Result<(), AppError> {
        let message = build_message(self.from.clone(), recipient, document)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::MailDelivery(e.to_string()))?;

        tracing::info!("📧 E-mail enviado para {} ({:?})", recipient, response.code());
        Ok(())
    }
}
