use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom;

/// At most one FAQ item is open at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Accordion {
    open: Option<usize>,
}

impl Accordion {
    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    /// Opens `index` and closes the rest, or closes it if it was the open one.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        self.open = if self.open == Some(index) { None } else { Some(index) };
        self.open
    }
}

#[derive(Serialize)]
struct Answer<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
struct Question<'a> {
    #[serde(rename = "@type")]
    kind: &'static str,
    name: &'a str,
    #[serde(rename = "acceptedAnswer")]
    accepted_answer: Answer<'a>,
}

#[derive(Serialize)]
struct FaqPage<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "mainEntity")]
    main_entity: Vec<Question<'a>>,
}

/// schema.org `FAQPage` structured data for the given question/answer pairs.
pub fn structured_data(pairs: &[(String, String)]) -> serde_json::Result<String> {
    let page = FaqPage {
        context: "https://schema.org",
        kind: "FAQPage",
        main_entity: pairs
            .iter()
            .map(|(question, answer)| Question {
                kind: "Question",
                name: question.trim(),
                accepted_answer: Answer {
                    kind: "Answer",
                    text: answer.trim(),
                },
            })
            .collect(),
    };
    serde_json::to_string(&page)
}

fn append_structured_data(document: &Document, pairs: &[(String, String)]) {
    let json = match structured_data(pairs) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not serialize FAQ data: {}", e);
            return;
        }
    };
    let Some(head) = document.head() else {
        return;
    };
    if let Ok(script) = document.create_element("script") {
        let _ = script.set_attribute("type", "application/ld+json");
        script.set_text_content(Some(&json));
        let _ = head.append_child(&script);
    }
}

pub fn init(document: &Document) {
    let items = dom::query_all(document, ".faq__item");
    if items.is_empty() {
        return;
    }

    let state = std::rc::Rc::new(std::cell::RefCell::new(Accordion::default()));
    let mut pairs = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let text_of = |selector: &str| {
            item.query_selector(selector)
                .ok()
                .flatten()
                .and_then(|el| el.text_content())
        };
        if let (Some(q), Some(a)) = (text_of("[itemprop=\"name\"]"), text_of("[itemprop=\"text\"]")) {
            pairs.push((q, a));
        }

        let Some(question) = item
            .query_selector(".faq__question")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let _ = question.set_attribute("tabindex", "0");

        let (state, all_items) = (state.clone(), items.clone());
        dom::listen(&question, "click", move |_| {
            let open = state.borrow_mut().toggle(index);
            for (i, other) in all_items.iter().enumerate() {
                dom::set_class(other, "active", open == Some(i));
            }
        });
        dom::click_on_activation_keys(&question);
    }

    if !pairs.is_empty() {
        append_structured_data(document, &pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_item_open() {
        let mut accordion = Accordion::default();
        assert_eq!(accordion.toggle(1), Some(1));
        assert_eq!(accordion.toggle(3), Some(3));
        assert_eq!(accordion.open_item(), Some(3));
        assert_eq!(accordion.toggle(3), None);
        assert_eq!(accordion.open_item(), None);
    }

    #[test]
    fn structured_data_shape() {
        let json = structured_data(&[(
            " ¿Cuánto tarda? ".to_string(),
            "Dos días.".to_string(),
        )])
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "FAQPage");
        assert_eq!(value["mainEntity"][0]["@type"], "Question");
        assert_eq!(value["mainEntity"][0]["name"], "¿Cuánto tarda?");
        assert_eq!(value["mainEntity"][0]["acceptedAnswer"]["text"], "Dos días.");
    }
}
