use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::animation::scroll::{self, SectionBounds};
use crate::dom;

/// Document title per section id while that section is under the header.
pub fn section_title(id: &str) -> Option<&'static str> {
    match id {
        "hero" => Some("JDD PAINTING - Pintura Profesional y Ecológica"),
        "servicios" => Some("Servicios de Pintura - JDD PAINTING"),
        "galeria" => Some("Galería de Proyectos - JDD PAINTING"),
        "testimonios" => Some("Testimonios de Clientes - JDD PAINTING"),
        "faq" => Some("Preguntas Frecuentes - JDD PAINTING"),
        "contacto" => Some("Contacto - JDD PAINTING"),
        _ => None,
    }
}

fn smooth_scroll_to(window: &Window, top: f64) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn header_height(header: &Option<HtmlElement>) -> f64 {
    header.as_ref().map(|h| h.offset_height() as f64).unwrap_or(0.0)
}

fn set_body_scroll_locked(document: &Document, locked: bool) {
    if let Some(body) = document.body() {
        let _ = body
            .style()
            .set_property("overflow", if locked { "hidden" } else { "" });
    }
}

fn wire_mobile_menu(document: &Document) {
    let Some(menu) = document.get_element_by_id("nav-menu") else {
        return;
    };

    if let Some(toggle) = document.get_element_by_id("nav-toggle") {
        let (menu, doc) = (menu.clone(), document.clone());
        dom::listen(&toggle, "click", move |_| {
            dom::set_class(&menu, "show-menu", true);
            set_body_scroll_locked(&doc, true);
        });
    }

    let mut closers = dom::query_all(document, ".nav__link");
    closers.extend(document.get_element_by_id("nav-close"));
    for closer in closers {
        let (menu, doc) = (menu.clone(), document.clone());
        dom::listen(&closer, "click", move |_| {
            dom::set_class(&menu, "show-menu", false);
            set_body_scroll_locked(&doc, false);
        });
    }
}

fn wire_anchor_links(window: &Window, document: &Document, header: Option<HtmlElement>) {
    for link in dom::query_all(document, "a[href^=\"#\"]") {
        let (window, doc, header) = (window.clone(), document.clone(), header.clone());
        let href = link.get_attribute("href").unwrap_or_default();
        dom::listen(&link, "click", move |event| {
            let id = href.trim_start_matches('#');
            if id.is_empty() {
                return;
            }
            let Some(section) = doc
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            event.prevent_default();
            let top = scroll::anchor_target(section.offset_top() as f64, header_height(&header));
            smooth_scroll_to(&window, top);
        });
    }
}

fn ensure_element(document: &Document, selector: &str, tag: &str, class: &str, inner_html: &str) -> Option<Element> {
    if let Ok(Some(existing)) = document.query_selector(selector) {
        return Some(existing);
    }
    let element = document.create_element(tag).ok()?;
    element.set_class_name(class);
    element.set_inner_html(inner_html);
    document.body()?.append_child(&element).ok()?;
    Some(element)
}

struct ScrollView {
    window: Window,
    document: Document,
    header: Option<HtmlElement>,
    nav_links: Vec<Element>,
    sections: Vec<HtmlElement>,
    hero_children: Vec<HtmlElement>,
    progress: Option<HtmlElement>,
    back_to_top: Option<Element>,
    original_title: String,
}

impl ScrollView {
    fn update(&self) {
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let header_h = header_height(&self.header);

        if let Some(header) = &self.header {
            dom::set_class(header, "scrolled", scroll::header_scrolled(scroll_y));
        }

        let bounds: Vec<SectionBounds> = self
            .sections
            .iter()
            .map(|s| SectionBounds {
                id: s.id(),
                top: s.offset_top() as f64,
                height: s.offset_height() as f64,
            })
            .collect();
        let active = scroll::active_section(&bounds, scroll_y, header_h);
        if let Some(active) = active {
            let wanted = format!("#{}", active);
            for link in &self.nav_links {
                let matches = link.get_attribute("href").as_deref() == Some(wanted.as_str());
                dom::set_class(link, "active", matches);
            }
        }
        let title = active.and_then(section_title).unwrap_or(self.original_title.as_str());
        if self.document.title() != title {
            self.document.set_title(title);
        }

        for (index, child) in self.hero_children.iter().enumerate() {
            let offset = scroll::hero_parallax(scroll_y, index);
            let _ = child.style().set_property("transform", &format!("translateY({}px)", offset));
        }

        if let Some(progress) = &self.progress {
            let document_height = self
                .document
                .document_element()
                .map(|el| el.scroll_height() as f64)
                .unwrap_or(0.0);
            let viewport = self
                .window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let percent = scroll::progress_percent(scroll_y, document_height, viewport);
            let _ = progress.style().set_property("width", &format!("{}%", percent));
        }

        if let Some(button) = &self.back_to_top {
            dom::set_class(button, "visible", scroll::back_to_top_visible(scroll_y));
        }
    }
}

/// Header, menu, anchors, progress bar and back-to-top button.
pub fn init(window: &Window, document: &Document) {
    let header = document
        .get_element_by_id("header")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());

    wire_mobile_menu(document);
    wire_anchor_links(window, document, header.clone());

    ensure_element(document, ".scroll-indicator", "div", "scroll-indicator", "<div class=\"scroll-progress\"></div>");
    let back_to_top = ensure_element(
        document,
        ".back-to-top",
        "button",
        "back-to-top",
        "<i class=\"fas fa-arrow-up\"></i>",
    );
    if let Some(button) = &back_to_top {
        let _ = button.set_attribute("aria-label", "Volver arriba");
        let _ = button.set_attribute("title", "Volver arriba");
        let win = window.clone();
        dom::listen(button, "click", move |_| smooth_scroll_to(&win, 0.0));
    }

    let view = Rc::new(ScrollView {
        window: window.clone(),
        document: document.clone(),
        header,
        nav_links: dom::query_all(document, ".nav__link"),
        sections: dom::query_all(document, "section[id]")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect(),
        hero_children: dom::query_all(document, ".hero .container > *")
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect(),
        progress: dom::query_html(document, ".scroll-progress"),
        back_to_top,
        original_title: document.title(),
    });

    // one layout pass per frame no matter how many scroll events arrive
    let ticking = Rc::new(Cell::new(false));
    let frame = {
        let (view, ticking) = (view.clone(), ticking.clone());
        Closure::wrap(Box::new(move |_: f64| {
            view.update();
            ticking.set(false);
        }) as Box<dyn FnMut(f64)>)
    };

    let win = window.clone();
    dom::listen(window, "scroll", move |_| {
        if ticking.get() {
            return;
        }
        if win.request_animation_frame(frame.as_ref().unchecked_ref()).is_ok() {
            ticking.set(true);
        }
    });

    view.update();
}
