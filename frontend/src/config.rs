#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3000"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

pub const CONTACT_PATH: &str = "/api/contact";

/// Mailbox used for the mail-client fallback link.
pub const CONTACT_EMAIL: &str = "jonathan.moreno.17.20@gmail.com";

pub const WHATSAPP_PHONE: &str = "1234567890";
pub const WHATSAPP_GREETING: &str =
    "Hola, me interesa solicitar un presupuesto para un proyecto de pintura.";

/// How a validated quote request leaves the browser. Exactly one path is
/// active per build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// POST to the relay endpoint.
    Server,
    /// Open the visitor's mail client with a pre-filled message.
    MailClient,
}

pub const DELIVERY_MODE: DeliveryMode = DeliveryMode::Server;

pub fn contact_endpoint() -> String {
    format!("{}{}", get_backend_url(), CONTACT_PATH)
}
