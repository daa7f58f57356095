use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::js_sys::Array;
use web_sys::{Document, IntersectionObserver, IntersectionObserverEntry, Window};

use crate::animation::observer::intersection_supported;
use crate::config;
use crate::dom;

pub fn whatsapp_url(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{}?text={}", digits, urlencoding::encode(message))
}

fn add_whatsapp_button(window: &Window, document: &Document) {
    let (Ok(button), Some(body)) = (document.create_element("a"), document.body()) else {
        return;
    };
    let _ = button.set_attribute("href", "#");
    button.set_class_name("whatsapp-float");
    button.set_inner_html("<i class=\"fab fa-whatsapp\"></i>");
    let _ = button.set_attribute("aria-label", "Contactar por WhatsApp");

    let url = whatsapp_url(config::WHATSAPP_PHONE, config::WHATSAPP_GREETING);
    let win = window.clone();
    dom::listen(&button, "click", move |event| {
        event.prevent_default();
        let _ = win.open_with_url_and_target(&url, "_blank");
    });
    let _ = body.append_child(&button);
}

fn add_skip_link(document: &Document) {
    let Some(body) = document.body() else {
        return;
    };
    if let Ok(Some(main)) = document.query_selector(".main") {
        main.set_id("main");
    }
    if let Ok(link) = document.create_element("a") {
        let _ = link.set_attribute("href", "#main");
        link.set_class_name("skip-link");
        link.set_text_content(Some("Saltar al contenido principal"));
        let _ = body.insert_before(&link, body.first_child().as_ref());
    }
}

/// Marks lazily loaded images once they scroll into view.
fn mark_lazy_images(document: &Document) {
    let images = dom::query_all(document, "img[loading=\"lazy\"]");
    if images.is_empty() || !intersection_supported() {
        return;
    }
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            if entry.is_intersecting() {
                let img = entry.target();
                dom::set_class(&img, "loaded", true);
                observer.unobserve(&img);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    if let Ok(observer) = IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
        for img in &images {
            observer.observe(img);
        }
        callback.forget();
    }
}

pub fn init(window: &Window, document: &Document) {
    add_skip_link(document);
    add_whatsapp_button(window, document);
    mark_lazy_images(document);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whatsapp_link_is_encoded() {
        assert_eq!(
            whatsapp_url("+1 (234) 567-890", "Hola, me interesa"),
            "https://wa.me/1234567890?text=Hola%2C%20me%20interesa"
        );
    }
}
