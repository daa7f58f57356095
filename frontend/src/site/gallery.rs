use web_sys::{Document, HtmlElement};
use wasm_bindgen::JsCast;

use crate::dom;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GalleryFilter {
    All,
    Category(String),
}

impl GalleryFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => GalleryFilter::All,
            other => GalleryFilter::Category(other.to_string()),
        }
    }

    pub fn shows(&self, category: Option<&str>) -> bool {
        match self {
            GalleryFilter::All => true,
            GalleryFilter::Category(wanted) => category.map(str::trim) == Some(wanted.as_str()),
        }
    }
}

fn apply(filter: &GalleryFilter, items: &[HtmlElement]) {
    for item in items {
        let style = item.style();
        if filter.shows(item.get_attribute("data-category").as_deref()) {
            let _ = style.set_property("display", "block");
            let _ = style.set_property("animation", "fadeInUp 0.5s ease-out forwards");
        } else {
            let _ = style.set_property("display", "none");
        }
    }
}

/// `.gallery__filter[data-filter]` buttons show the `.gallery__item` entries
/// whose `data-category` matches.
pub fn init(document: &Document) {
    let buttons: Vec<HtmlElement> = dom::query_all(document, ".gallery__filter")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let items: Vec<HtmlElement> = dom::query_all(document, ".gallery__item")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    if buttons.is_empty() {
        return;
    }

    for button in &buttons {
        let filter = GalleryFilter::parse(&button.get_attribute("data-filter").unwrap_or_default());
        let (all_buttons, items, this) = (buttons.clone(), items.clone(), button.clone());
        dom::listen(button, "click", move |_| {
            for other in &all_buttons {
                dom::set_class(other, "active", false);
            }
            dom::set_class(&this, "active", true);
            apply(&filter, &items);
        });
        dom::click_on_activation_keys(button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shows_everything() {
        let filter = GalleryFilter::parse("all");
        assert_eq!(filter, GalleryFilter::All);
        assert!(filter.shows(Some("interior")));
        assert!(filter.shows(None));
    }

    #[test]
    fn category_matches_exactly() {
        let filter = GalleryFilter::parse("exterior");
        assert!(filter.shows(Some("exterior")));
        assert!(filter.shows(Some(" exterior ")));
        assert!(!filter.shows(Some("interior")));
        assert!(!filter.shows(None));
    }
}
