use serde::Deserialize;

use super::validation::{validate, FormValues, ValidationResult};
use crate::config::DeliveryMode;

pub const MAIL_SUBJECT: &str = "Solicitud de Cotización - JDD PAINTING";
pub const MAIL_CLIENT_OPENED: &str =
    "¡Gracias! Se ha abierto tu cliente de email. Por favor envía el mensaje.";
pub const NETWORK_ERROR: &str =
    "No pudimos enviar tu mensaje. Revisa tu conexión e inténtalo de nuevo.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn class_suffix(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

/// What the visitor is told after a send attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationResult {
    pub kind: NotificationKind,
    pub message: String,
}

impl NotificationResult {
    pub fn success(message: impl Into<String>) -> Self {
        NotificationResult { kind: NotificationKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        NotificationResult { kind: NotificationKind::Error, message: message.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryRequest {
    Post { url: String, body: String },
    OpenMailClient { href: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitStep {
    /// Validation failed; nothing leaves the page.
    Rejected(ValidationResult),
    Deliver(DeliveryRequest),
}

/// Context the mail-client message is stamped with.
#[derive(Clone, Debug)]
pub struct PageContext {
    pub endpoint: String,
    pub recipient: String,
    pub page_url: String,
    pub date: String,
}

pub fn encode_form(values: &FormValues) -> String {
    [
        ("name", &values.name),
        ("email", &values.email),
        ("phone", &values.phone),
        ("service", &values.service),
        ("message", &values.message),
    ]
    .iter()
    .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value.trim())))
    .collect::<Vec<_>>()
    .join("&")
}

pub fn mail_body(values: &FormValues, page_url: &str, date: &str) -> String {
    format!(
        "Nuevo mensaje desde JDD PAINTING:\n\n\
         Nombre: {}\n\
         Email: {}\n\
         Teléfono: {}\n\
         Servicio: {}\n\
         Mensaje: {}\n\n\
         Enviado desde: {}\n\
         Fecha: {}\n",
        values.name.trim(),
        values.email.trim(),
        values.phone.trim(),
        values.service.trim(),
        values.message.trim(),
        page_url,
        date,
    )
}

pub fn mailto_link(recipient: &str, values: &FormValues, page_url: &str, date: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        urlencoding::encode(MAIL_SUBJECT),
        urlencoding::encode(&mail_body(values, page_url, date)),
    )
}

/// Validates and, when everything passes, describes the one delivery the
/// configured mode calls for.
pub fn prepare(values: &FormValues, mode: DeliveryMode, context: &PageContext) -> SubmitStep {
    let result = validate(values);
    if !result.is_valid() {
        return SubmitStep::Rejected(result);
    }
    let request = match mode {
        DeliveryMode::Server => DeliveryRequest::Post {
            url: context.endpoint.clone(),
            body: encode_form(values),
        },
        DeliveryMode::MailClient => DeliveryRequest::OpenMailClient {
            href: mailto_link(&context.recipient, values, &context.page_url, &context.date),
        },
    };
    SubmitStep::Deliver(request)
}

#[derive(Deserialize)]
struct RelayReply {
    success: Option<String>,
    error: Option<String>,
}

/// Maps the relay's `{"success": ..}` / `{"error": ..}` reply to a
/// notification.
pub fn interpret(status: u16, body: &str) -> NotificationResult {
    let reply: Option<RelayReply> = serde_json::from_str(body).ok();
    match (status, reply) {
        (200..=299, Some(RelayReply { success: Some(message), .. })) => NotificationResult::success(message),
        (200..=299, _) => NotificationResult::success("¡Gracias! Tu mensaje ha sido enviado."),
        (_, Some(RelayReply { error: Some(message), .. })) => NotificationResult::error(message),
        _ => NotificationResult::error(NETWORK_ERROR),
    }
}
