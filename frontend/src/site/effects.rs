use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, MouseEvent, Window};

use crate::animation::scroll;
use crate::dom;

const WAVE_MS: u32 = 600;
const PULSE_MS: u32 = 600;
const CARD_SELECTOR: &str = ".timeline__item, .mission-vision__card, .certification__item, .team__card";
const LIFTED: &str = "translateY(-12px) scale(1.02)";
const RESTING: &str = "translateY(0) scale(1)";
const LIFTED_SHADOW: &str = "0 24px 60px rgba(0, 0, 0, 0.15)";

/// Square wave centred on the click point, in the button's own coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

pub fn ripple(rect_left: f64, rect_top: f64, width: f64, height: f64, client_x: f64, client_y: f64) -> Ripple {
    let size = width.max(height);
    Ripple {
        size,
        left: client_x - rect_left - size / 2.0,
        top: client_y - rect_top - size / 2.0,
    }
}

fn wire_waves(document: &Document) {
    for button in dom::query_all(document, ".btn, .cta__button") {
        let (doc, target) = (document.clone(), button.clone());
        dom::listen(&button, "click", move |event| {
            let Some(click) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = target.get_bounding_client_rect();
            let geometry = ripple(
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height(),
                f64::from(click.client_x()),
                f64::from(click.client_y()),
            );
            let Some(wave) = doc
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            wave.set_class_name("wave-effect");
            let style = wave.style();
            let size = format!("{}px", geometry.size);
            let _ = style.set_property("width", &size);
            let _ = style.set_property("height", &size);
            let _ = style.set_property("left", &format!("{}px", geometry.left));
            let _ = style.set_property("top", &format!("{}px", geometry.top));
            if target.append_child(&wave).is_ok() {
                Timeout::new(WAVE_MS, move || wave.remove()).forget();
            }
        });
    }
}

fn wire_cards(document: &Document) {
    let cards = dom::query_all(document, CARD_SELECTOR)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok());
    for card in cards {
        let el = card.clone();
        dom::listen(&card, "mouseenter", move |_| {
            if el.class_list().contains("hovering") {
                return;
            }
            dom::set_class(&el, "hovering", true);
            let _ = el.style().set_property("transform", LIFTED);
            let _ = el.style().set_property("box-shadow", LIFTED_SHADOW);
        });

        let el = card.clone();
        dom::listen(&card, "mouseleave", move |_| {
            dom::set_class(&el, "hovering", false);
            let _ = el.style().set_property("transform", RESTING);
            let _ = el.style().set_property("box-shadow", "");
        });

        let el = card.clone();
        dom::listen(&card, "click", move |_| {
            let _ = el.style().set_property("animation", "simplePulse 0.6s ease-out");
            let el = el.clone();
            Timeout::new(PULSE_MS, move || {
                let _ = el.style().set_property("animation", "");
            })
            .forget();
        });
    }
}

fn wire_about_parallax(window: &Window, document: &Document) {
    let Some(hero) = dom::query_html(document, ".hero-about") else {
        return;
    };

    let ticking = Rc::new(Cell::new(false));
    let frame = {
        let (win, ticking) = (window.clone(), ticking.clone());
        Closure::wrap(Box::new(move |_: f64| {
            let scroll_y = win.scroll_y().unwrap_or(0.0);
            let width = win.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
            let height = win.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0);
            if let Some(offset) = scroll::about_hero_offset(scroll_y, width, height) {
                let _ = hero.style().set_property("transform", &format!("translateY({}px)", offset));
            }
            ticking.set(false);
        }) as Box<dyn FnMut(f64)>)
    };

    let win = window.clone();
    dom::listen(window, "scroll", move |_| {
        let width = win.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
        if ticking.get() || scroll::is_mobile(width) {
            return;
        }
        if win.request_animation_frame(frame.as_ref().unchecked_ref()).is_ok() {
            ticking.set(true);
        }
    });
}

/// Button waves, lifted cards and the about-page hero drift.
pub fn init(window: &Window, document: &Document) {
    wire_waves(document);
    wire_cards(document);
    wire_about_parallax(window, document);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ripple_is_centred_on_the_click() {
        let wave = ripple(100.0, 50.0, 200.0, 40.0, 150.0, 70.0);
        assert_eq!(wave.size, 200.0);
        assert_eq!(wave.left, -50.0);
        assert_eq!(wave.top, -80.0);
    }

    #[test]
    fn ripple_uses_the_longer_side() {
        let wave = ripple(0.0, 0.0, 30.0, 60.0, 15.0, 30.0);
        assert_eq!(wave, Ripple { size: 60.0, left: -15.0, top: 0.0 });
    }
}
