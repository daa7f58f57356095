use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn query_all(root: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("Invalid selector '{}'", selector);
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_within(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_html(root: &Document, selector: &str) -> Option<HtmlElement> {
    root.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// Attaches a listener that stays for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("Failed to attach '{}' listener", event);
    }
    callback.forget();
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

/// Turns Enter and Space on a focusable element into a click.
pub fn click_on_activation_keys(element: &HtmlElement) {
    let el = element.clone();
    listen(element, "keydown", move |event| {
        if let Some(key_event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
            let key = key_event.key();
            if key == "Enter" || key == " " {
                event.prevent_default();
                el.click();
            }
        }
    });
}
