use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use super::submission::{
    self, DeliveryRequest, NotificationKind, NotificationResult, PageContext, SubmitStep,
};
use super::validation::{validate_consent, validate_field, Field, FormValues, ValidationResult};
use crate::components::notification::show_notification;
use crate::config;
use crate::dom;

const SENDING_LABEL: &str = "Enviando...";

fn value_of(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn field_element(form: &HtmlFormElement, field: Field) -> Option<Element> {
    form.query_selector(&format!("[name=\"{}\"]", field.name()))
        .ok()
        .flatten()
}

fn read_values(form: &HtmlFormElement) -> FormValues {
    let text = |field| field_element(form, field).map(|el| value_of(&el)).unwrap_or_default();
    let consent = field_element(form, Field::Privacy)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|checkbox| checkbox.checked());
    FormValues {
        name: text(Field::Name),
        email: text(Field::Email),
        phone: text(Field::Phone),
        service: text(Field::Service),
        message: text(Field::Message),
        consent,
    }
}

/// Marks or clears one field and its `{name}-error` message slot.
fn show_field_error(document: &Document, element: &Element, field: Field, message: Option<&str>) {
    dom::set_class(element, "error", message.is_some());
    if let Some(slot) = document.get_element_by_id(&format!("{}-error", field.name())) {
        slot.set_text_content(Some(message.unwrap_or("")));
        dom::set_class(&slot, "show", message.is_some());
    }
}

fn check_field(document: &Document, element: &Element, field: Field) -> bool {
    let error = if field == Field::Privacy {
        let checked = element
            .dyn_ref::<HtmlInputElement>()
            .map(|checkbox| checkbox.checked());
        validate_consent(checked)
    } else {
        validate_field(field, &value_of(element))
    };
    show_field_error(document, element, field, error.map(|e| e.message()));
    error.is_none()
}

fn show_result(document: &Document, form: &HtmlFormElement, result: &ValidationResult) {
    for field in [Field::Name, Field::Email, Field::Phone, Field::Service, Field::Message, Field::Privacy] {
        if let Some(element) = field_element(form, field) {
            let message = result.error_for(field).map(|e| e.message());
            show_field_error(document, &element, field, message);
        }
    }
    if let Some(first) = result.errors().first() {
        if let Some(element) = field_element(form, first.field)
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = element.focus();
        }
    }
}

fn page_context(document: &Document) -> PageContext {
    let page_url = document
        .location()
        .and_then(|location| location.href().ok())
        .unwrap_or_default();
    PageContext {
        endpoint: config::contact_endpoint(),
        recipient: config::CONTACT_EMAIL.to_string(),
        page_url,
        date: chrono::Local::now().format("%d/%m/%Y %H:%M").to_string(),
    }
}

async fn post_form(url: &str, body: String) -> NotificationResult {
    let response = Request::post(url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await;
    match response {
        Ok(response) => {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            submission::interpret(status, &text)
        }
        Err(e) => {
            log::error!("Contact request failed: {}", e);
            NotificationResult::error(submission::NETWORK_ERROR)
        }
    }
}

struct BusyButton {
    button: Option<HtmlButtonElement>,
    label: String,
}

impl BusyButton {
    fn engage(form: &HtmlFormElement) -> Self {
        let button = form
            .query_selector("button[type=\"submit\"], .contact__button")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        let label = button.as_ref().map(|b| b.inner_html()).unwrap_or_default();
        if let Some(button) = &button {
            button.set_disabled(true);
            button.set_text_content(Some(SENDING_LABEL));
        }
        BusyButton { button, label }
    }

    fn release(self) {
        if let Some(button) = self.button {
            button.set_inner_html(&self.label);
            button.set_disabled(false);
        }
    }
}

fn submit(document: &Document, form: &HtmlFormElement) {
    let values = read_values(form);
    let request = match submission::prepare(&values, config::DELIVERY_MODE, &page_context(document)) {
        SubmitStep::Rejected(result) => {
            show_result(document, form, &result);
            return;
        }
        SubmitStep::Deliver(request) => request,
    };

    let busy = BusyButton::engage(form);
    let form = form.clone();
    spawn_local(async move {
        let result = match request {
            DeliveryRequest::Post { url, body } => post_form(&url, body).await,
            DeliveryRequest::OpenMailClient { href } => {
                let opened = web_sys::window()
                    .map(|w| w.location().set_href(&href).is_ok())
                    .unwrap_or(false);
                if opened {
                    NotificationResult {
                        kind: NotificationKind::Info,
                        message: submission::MAIL_CLIENT_OPENED.to_string(),
                    }
                } else {
                    NotificationResult::error(submission::NETWORK_ERROR)
                }
            }
        };
        if result.kind != NotificationKind::Error {
            form.reset();
        }
        show_notification(&result.message, result.kind);
        busy.release();
    });
}

pub fn init(document: &Document) {
    let Some(form) = document
        .get_element_by_id("contact-form")
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };

    for field in [Field::Name, Field::Email, Field::Phone, Field::Service, Field::Message, Field::Privacy] {
        let Some(element) = field_element(&form, field) else {
            continue;
        };
        let (doc, el) = (document.clone(), element.clone());
        dom::listen(&element, "blur", move |_| {
            check_field(&doc, &el, field);
        });
        // Once flagged, a field re-checks as the visitor types.
        let (doc, el) = (document.clone(), element.clone());
        let live_event = if field == Field::Privacy || field == Field::Service { "change" } else { "input" };
        dom::listen(&element, live_event, move |_| {
            if el.class_list().contains("error") {
                check_field(&doc, &el, field);
            }
        });
    }

    let (doc, target) = (document.clone(), form.clone());
    dom::listen(&form, "submit", move |event| {
        event.prevent_default();
        submit(&doc, &target);
    });
    log::info!("Contact form ready ({:?} delivery)", config::DELIVERY_MODE);
}
