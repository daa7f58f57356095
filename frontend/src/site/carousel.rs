use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::animation::scroll;
use crate::dom;

const AUTO_ADVANCE_MS: u32 = 5000;

const NAVIGATION_CSS: &str = "
.testimonials__navigation { display: flex; justify-content: center; gap: 0.5rem; margin-top: 2rem; }
.testimonials__dot { width: 12px; height: 12px; border-radius: 50%; border: none; background: #e9ecef; cursor: pointer; transition: background-color 0.3s ease; }
.testimonials__dot.active { background: var(--color-primary); }
@media (min-width: 769px) { .testimonials__navigation { display: none; } }
";

/// One testimonial shown at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    current: usize,
}

/// The card to hide and the card to show after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slide {
    pub hide: usize,
    pub show: usize,
}

impl Carousel {
    /// Only a small screen with more than one card gets a carousel.
    pub fn for_viewport(viewport_width: f64, len: usize) -> Option<Self> {
        (scroll::is_mobile(viewport_width) && len > 1).then_some(Carousel { len, current: 0 })
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn go_to(&mut self, index: usize) -> Option<Slide> {
        if index >= self.len || index == self.current {
            return None;
        }
        let slide = Slide { hide: self.current, show: index };
        self.current = index;
        Some(slide)
    }

    /// Moves to the next card, wrapping after the last one.
    pub fn advance(&mut self) -> Slide {
        let next = (self.current + 1) % self.len;
        let slide = Slide { hide: self.current, show: next };
        self.current = next;
        slide
    }
}

struct Deck {
    cards: Vec<HtmlElement>,
    dots: Vec<Element>,
}

impl Deck {
    fn show(&self, slide: Slide) {
        if let (Some(card), Some(dot)) = (self.cards.get(slide.hide), self.dots.get(slide.hide)) {
            let _ = card.style().set_property("display", "none");
            dom::set_class(dot, "active", false);
        }
        if let (Some(card), Some(dot)) = (self.cards.get(slide.show), self.dots.get(slide.show)) {
            let _ = card.style().set_property("display", "block");
            dom::set_class(dot, "active", true);
        }
    }
}

fn append_styles(document: &Document) {
    let (Ok(style), Some(head)) = (document.create_element("style"), document.head()) else {
        return;
    };
    style.set_text_content(Some(NAVIGATION_CSS));
    let _ = head.append_child(&style);
}

fn build_dots(document: &Document, count: usize) -> Option<(Element, Vec<Element>)> {
    let navigation = document.create_element("div").ok()?;
    navigation.set_class_name("testimonials__navigation");
    let mut dots = Vec::with_capacity(count);
    for index in 0..count {
        let dot = document.create_element("button").ok()?;
        dot.set_class_name(if index == 0 { "testimonials__dot active" } else { "testimonials__dot" });
        let _ = dot.set_attribute("data-index", &index.to_string());
        let _ = dot.set_attribute("aria-label", &format!("Testimonio {}", index + 1));
        navigation.append_child(&dot).ok()?;
        dots.push(dot);
    }
    Some((navigation, dots))
}

/// Mobile testimonials: one card at a time, dots to pick one, and an
/// automatic advance every five seconds.
pub fn init(window: &Window, document: &Document) {
    let Ok(Some(grid)) = document.query_selector(".testimonials__grid") else {
        return;
    };
    let cards: Vec<HtmlElement> = dom::query_within(&grid, ".testimonial__card")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let width = window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0);
    let Some(carousel) = Carousel::for_viewport(width, cards.len()) else {
        return;
    };
    let (Some(parent), Some((navigation, dots))) = (grid.parent_node(), build_dots(document, cards.len())) else {
        return;
    };

    append_styles(document);
    if parent.append_child(&navigation).is_err() {
        log::warn!("Could not add testimonial navigation");
        return;
    }
    for card in cards.iter().skip(1) {
        let _ = card.style().set_property("display", "none");
    }

    let deck = Rc::new(Deck { cards, dots });
    let carousel = Rc::new(RefCell::new(carousel));

    for (index, dot) in deck.dots.iter().enumerate() {
        let (deck, carousel) = (deck.clone(), carousel.clone());
        dom::listen(dot, "click", move |_| {
            let slide = carousel.borrow_mut().go_to(index);
            if let Some(slide) = slide {
                deck.show(slide);
            }
        });
    }

    Interval::new(AUTO_ADVANCE_MS, move || {
        let slide = carousel.borrow_mut().advance();
        deck.show(slide);
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_small_screens_with_several_cards() {
        assert!(Carousel::for_viewport(375.0, 3).is_some());
        assert!(Carousel::for_viewport(768.0, 2).is_some());
        assert!(Carousel::for_viewport(1024.0, 3).is_none());
        assert!(Carousel::for_viewport(375.0, 1).is_none());
    }

    #[test]
    fn dots_jump_and_ignore_the_current_card() {
        let mut carousel = Carousel::for_viewport(375.0, 3).unwrap();
        assert_eq!(carousel.go_to(0), None);
        assert_eq!(carousel.go_to(2), Some(Slide { hide: 0, show: 2 }));
        assert_eq!(carousel.current(), 2);
        assert_eq!(carousel.go_to(7), None);
        assert_eq!(carousel.current(), 2);
    }

    #[test]
    fn auto_advance_wraps_around() {
        let mut carousel = Carousel::for_viewport(375.0, 3).unwrap();
        assert_eq!(carousel.advance(), Slide { hide: 0, show: 1 });
        assert_eq!(carousel.advance(), Slide { hide: 1, show: 2 });
        assert_eq!(carousel.advance(), Slide { hide: 2, show: 0 });
        carousel.go_to(1);
        assert_eq!(carousel.advance(), Slide { hide: 1, show: 2 });
    }
}
