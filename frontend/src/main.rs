use log::{info, Level};
use web_sys::{Document, Window};

mod config;
mod dom;
mod animation {
    pub mod coordinator;
    pub mod counter;
    pub mod frames;
    pub mod observer;
    pub mod profiles;
    pub mod scroll;
    pub mod text_effects;
    pub mod typewriter;
}
mod site {
    pub mod carousel;
    pub mod effects;
    pub mod extras;
    pub mod faq;
    pub mod gallery;
    pub mod navigation;
}
mod contact {
    pub mod form;
    pub mod submission;
    pub mod validation;
}
mod components {
    pub mod notification;
}

use animation::{observer, profiles, text_effects};

fn start(window: &Window, document: &Document) {
    let coordinator = observer::start(document, profiles::site_groups());
    info!("Watching {} elements for reveal", coordinator.borrow().pending());

    text_effects::start_word_rotator(document);
    text_effects::start_typewriters(document);

    site::navigation::init(window, document);
    site::gallery::init(document);
    site::faq::init(document);
    site::extras::init(window, document);
    site::carousel::init(window, document);
    site::effects::init(window, document);
    contact::form::init(document);

    if let Some(root) = document.document_element() {
        dom::set_class(&root, "js-ready", true);
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let _ = console_log::init_with_level(Level::Info);

    let (Some(window), Some(document)) = (web_sys::window(), dom::document()) else {
        return;
    };

    info!("Starting site scripts");
    if document.ready_state() == "loading" {
        let (win, doc) = (window.clone(), document.clone());
        let mut started = false;
        dom::listen(&document, "DOMContentLoaded", move |_| {
            if !std::mem::replace(&mut started, true) {
                start(&win, &doc);
            }
        });
    } else {
        start(&window, &document);
    }
}
