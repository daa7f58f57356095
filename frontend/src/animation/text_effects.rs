use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::coordinator::{Coordinator, RevealProfile, Watched};
use super::frames::run_frames;
use super::observer::intersection_supported;
use super::typewriter::{RotatorFrame, Typewriter, WordRotator};
use crate::dom;

const TYPEWRITER_SELECTOR: &str = ".typewriter, .hero__title .animated-text";
const ROTATOR_SELECTOR: &str = ".hero__title--animated, .animated-text";
const CHAR_MS: u32 = 50;
const ROTATE_START_MS: u32 = 2000;
const ROTATE_INTERVAL_MS: u32 = 3000;
const ROTATE_FADE_MS: u32 = 200;
const ROTATE_SAMPLE_MS: u32 = 50;

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Rotates the hero title through its `data-words`.
pub fn start_word_rotator(document: &Document) {
    let Some(element) = dom::query_all(document, ROTATOR_SELECTOR)
        .into_iter()
        .find(|el| el.has_attribute("data-words"))
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let Some(rotator) = element
        .get_attribute("data-words")
        .and_then(|raw| WordRotator::from_attribute(&raw, ROTATE_START_MS, ROTATE_INTERVAL_MS, ROTATE_FADE_MS))
    else {
        return;
    };

    let started = now_ms();
    let mut last = RotatorFrame { index: 0, fading: false };
    Interval::new(ROTATE_SAMPLE_MS, move || {
        let frame = rotator.phase(now_ms() - started);
        if frame == last {
            return;
        }
        dom::set_class(&element, "fade-out", frame.fading);
        if frame.index != last.index {
            element.set_text_content(Some(rotator.word(frame.index)));
        }
        last = frame;
    })
    .forget();
}

fn type_out(element: HtmlElement) {
    let text = element.text_content().unwrap_or_default();
    let typewriter = Typewriter::new(text, CHAR_MS);
    log::debug!("Typing out over {}ms", typewriter.duration_ms());
    element.set_text_content(Some(""));
    let _ = element.style().set_property("opacity", "1");

    let el = element.clone();
    let scheduled = run_frames(move |elapsed| {
        el.set_text_content(Some(typewriter.advance(elapsed)));
        !typewriter.is_finished(elapsed)
    });
    if !scheduled {
        // leave the original text in place
        element.set_text_content(Some(&element.get_attribute("data-text").unwrap_or_default()));
    }
}

/// Types out `.typewriter` elements the first time they are 30% visible.
pub fn start_typewriters(document: &Document) {
    let elements: Vec<HtmlElement> = dom::query_all(document, TYPEWRITER_SELECTOR)
        .into_iter()
        .filter(|el| !el.has_attribute("data-words"))
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    if elements.is_empty() {
        return;
    }
    for element in &elements {
        if let Some(text) = element.text_content() {
            let _ = element.set_attribute("data-text", &text);
        }
    }

    if !intersection_supported() {
        elements.into_iter().for_each(type_out);
        return;
    }

    let profile = RevealProfile {
        threshold: 0.3,
        root_margin: "0px",
        ..RevealProfile::default()
    };
    let mut coordinator = Coordinator::new();
    let ids = coordinator.register(elements.iter().cloned().map(Watched::new), profile.clone());
    for (element, id) in elements.iter().zip(&ids) {
        let _ = element.set_attribute("data-typewriter-id", &id.to_string());
    }
    let coordinator = Rc::new(RefCell::new(coordinator));

    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let target = entry.target();
            let Some(id) = target
                .get_attribute("data-typewriter-id")
                .and_then(|raw| raw.parse().ok())
            else {
                continue;
            };
            let ratio = if entry.is_intersecting() { entry.intersection_ratio().max(f64::EPSILON) } else { 0.0 };
            let plan = coordinator.borrow_mut().on_intersect(id, ratio);
            if let Some(plan) = plan {
                observer.unobserve(&target);
                type_out(plan.target);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(profile.threshold));
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => {
            for element in &elements {
                observer.observe(element);
            }
            callback.forget();
        }
        Err(e) => {
            log::warn!("Typewriter observer failed: {:?}", e);
            elements.into_iter().for_each(type_out);
        }
    }
}
