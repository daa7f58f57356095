use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{Method, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::api::mailer::OutgoingEmail;
use crate::handlers::contact_dtos::RawSubmission;
use crate::utils::{email_template, sanitize};
use crate::AppState;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed.";
pub const MISSING_FIELDS: &str = "Please fill in all required fields.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const SENT: &str =
    "Thank you! Your message has been sent successfully. We'll get back to you within 24 hours.";
pub const SEND_FAILED: &str =
    "Sorry, there was an error sending your message. Please try again or contact us directly.";

type ApiError = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Relays one quote request from the site's contact form to the owner's
/// mailbox. Everything the browser already checked is checked again here.
pub async fn handle_submission(
    State(state): State<Arc<AppState>>,
    method: Method,
    form: Result<Form<RawSubmission>, FormRejection>,
) -> Result<Json<Value>, ApiError> {
    if method != Method::POST {
        tracing::info!("Rejected {} request to contact endpoint", method);
        return Err(error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED));
    }

    let Form(raw) = form.map_err(|rejection| {
        tracing::warn!("Unreadable contact form body: {}", rejection);
        error(StatusCode::BAD_REQUEST, MISSING_FIELDS)
    })?;

    let submission = raw.clean();
    if !submission.has_required_fields() {
        tracing::info!("Contact submission rejected: missing required fields");
        return Err(error(StatusCode::BAD_REQUEST, MISSING_FIELDS));
    }
    if !sanitize::is_valid_email(&submission.email) {
        tracing::info!("Contact submission rejected: invalid email");
        return Err(error(StatusCode::BAD_REQUEST, INVALID_EMAIL));
    }

    let email = OutgoingEmail {
        to: state.recipient.clone(),
        from: state.mail_from.clone(),
        from_name: Some(submission.name.clone()),
        reply_to: submission.email.clone(),
        subject: email_template::subject(&state.site_name, &submission.service),
        html_body: email_template::render(&state.site_name, &submission),
    };

    match state.mailer.send(email).await {
        Ok(()) => {
            tracing::info!("Quote request for '{}' relayed", submission.service);
            Ok(Json(json!({ "success": SENT })))
        }
        Err(e) => {
            tracing::error!("Failed to relay quote request: {}", e);
            Err(error(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mailer::{MailError, MockMailer};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    const VALID_BODY: &str =
        "name=Jane&email=jane%40x.com&phone=555-123-4567&service=paint&message=Two+rooms";

    fn app(mailer: MockMailer) -> Router {
        let state = Arc::new(AppState {
            mailer: Arc::new(mailer),
            recipient: "owner@jddpainting.com".to_string(),
            mail_from: "website@jddpainting.com".to_string(),
            site_name: "JDD PAINTING".to_string(),
        });
        crate::build_router(state, None)
    }

    fn post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn silent_mailer() -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        mailer
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/api/contact")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(silent_mailer()), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed." }));
    }

    #[tokio::test]
    async fn missing_phone_is_bad_request() {
        let body = "name=Jane&email=jane%40x.com&service=paint&message=hi";
        let (status, body) = call(app(silent_mailer()), post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_FIELDS);
    }

    #[tokio::test]
    async fn whitespace_only_name_counts_as_missing() {
        let body = "name=+++&email=jane%40x.com&phone=555-123-4567&service=paint";
        let (status, body) = call(app(silent_mailer()), post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MISSING_FIELDS);
    }

    #[tokio::test]
    async fn malformed_email_is_bad_request() {
        let body = "name=Jane&email=bad&phone=555-123-4567&service=paint";
        let (status, body) = call(app(silent_mailer()), post(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_EMAIL);
    }

    #[tokio::test]
    async fn non_form_body_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, _) = call(app(silent_mailer()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_submission_sends_exactly_one_email() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email| {
                email.to == "owner@jddpainting.com"
                    && email.reply_to == "jane@x.com"
                    && email.from == "website@jddpainting.com"
                    && email.subject == "New Quote Request from JDD PAINTING Website - paint"
                    && email.html_body.contains("Two rooms")
            })
            .times(1)
            .returning(|_| Ok(()));

        let (status, body) = call(app(mailer), post(VALID_BODY)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": SENT }));
    }

    #[tokio::test]
    async fn legacy_path_is_served_by_the_same_handler() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let mut request = post(VALID_BODY);
        *request.uri_mut() = "/contact.php".parse().unwrap();
        let (status, _) = call(app(mailer), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn transport_failure_is_internal_error() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| {
            let err = "not-an-address".parse::<lettre::Address>().unwrap_err();
            Err(MailError::Address(err))
        });

        let (status, body) = call(app(mailer), post(VALID_BODY)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": SEND_FAILED }));
    }
}
