use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use super::coordinator::{
    Coordinator, CounterPlan, Entrance, RevealPlan, WatchId, WatchState, Watched,
};
use super::counter::{parse_target, CounterFormat, CounterTween};
use super::frames::run_frames;
use super::profiles::{CounterSource, RevealGroup};
use crate::dom;

const WATCH_ID_ATTR: &str = "data-watch-id";
const TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

/// What the coordinator tracks for one element: the element that animates,
/// the element that shows the number for stat blocks, and the observer that
/// watches it.
#[derive(Clone)]
pub struct RevealTarget {
    element: HtmlElement,
    number: Option<HtmlElement>,
    observer: Option<IntersectionObserver>,
}

impl RevealTarget {
    fn release(&self) {
        if let Some(observer) = &self.observer {
            observer.unobserve(&self.element);
        }
    }
}

pub type SharedCoordinator = Rc<RefCell<Coordinator<RevealTarget>>>;

pub fn intersection_supported() -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("IntersectionObserver")).unwrap_or(false))
        .unwrap_or(false)
}

/// Scans the document for every group, hides the matches and starts
/// watching them. Without intersection support everything is shown right
/// away.
pub fn start(document: &Document, groups: Vec<RevealGroup>) -> SharedCoordinator {
    let coordinator: SharedCoordinator = Rc::new(RefCell::new(Coordinator::new()));
    let supported = intersection_supported();
    let mut watched_total = 0;

    for group in groups {
        let elements = matching(document, &group);
        if elements.is_empty() {
            continue;
        }

        let observer = if supported {
            match group_observer(&coordinator, &group) {
                Ok(observer) => Some(observer),
                Err(e) => {
                    log::warn!("Could not observe '{}': {:?}", group.selector, e);
                    None
                }
            }
        } else {
            None
        };

        let batch = elements
            .iter()
            .map(|element| watched(element.clone(), group.counter, observer.clone()));
        let ids = coordinator.borrow_mut().register(batch, group.profile.clone());
        watched_total += ids.len();

        for (element, id) in elements.iter().zip(&ids) {
            let _ = element.set_attribute(WATCH_ID_ATTR, &id.to_string());
        }

        match &observer {
            Some(observer) => {
                for element in &elements {
                    hide(element, group.profile.entrance);
                    observer.observe(element);
                }
            }
            // observer creation failed: show this group as if it were in view
            None if supported => {
                let plans: Vec<_> = ids
                    .iter()
                    .filter_map(|id| coordinator.borrow_mut().on_intersect(*id, 1.0))
                    .collect();
                apply_all(plans);
            }
            None => {}
        }
    }

    if !supported {
        log::info!("IntersectionObserver missing, revealing {} elements", watched_total);
        apply_all(coordinator.borrow_mut().reveal_all());
    }
    coordinator
}

fn matching(document: &Document, group: &RevealGroup) -> Vec<HtmlElement> {
    dom::query_all(document, group.selector)
        .into_iter()
        // an element matched by an earlier group stays with that group
        .filter(|el| !el.has_attribute(WATCH_ID_ATTR))
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn watched(
    element: HtmlElement,
    counter: CounterSource,
    observer: Option<IntersectionObserver>,
) -> Watched<RevealTarget> {
    let number = match counter {
        CounterSource::None => None,
        CounterSource::Own => Some(element.clone()),
        CounterSource::Child(selector) => element
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
    };
    let counter_target = number.as_ref().and_then(|n| {
        let explicit = n
            .get_attribute("data-number")
            .or_else(|| n.get_attribute("data-counter"));
        parse_target(explicit.as_deref(), &n.text_content().unwrap_or_default())
    });
    Watched::new(RevealTarget { element, number, observer }).with_counter(counter_target)
}

fn group_observer(
    coordinator: &SharedCoordinator,
    group: &RevealGroup,
) -> Result<IntersectionObserver, JsValue> {
    let shared = coordinator.clone();
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        // anything removed from the page is released by the observer that owns it
        let gone = shared.borrow_mut().prune(|t| t.element.is_connected());
        for target in gone {
            target.release();
        }

        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let target = entry.target();
            let Some(id) = watch_id(&target) else {
                observer.unobserve(&target);
                continue;
            };
            let ratio = if entry.is_intersecting() {
                entry.intersection_ratio().max(f64::EPSILON)
            } else {
                0.0
            };

            let plan = shared.borrow_mut().on_intersect(id, ratio);
            if let Some(plan) = plan {
                plan.target.release();
                apply(plan);
            } else if shared.borrow().state(id) != Some(WatchState::Pending) {
                observer.unobserve(&target);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(group.profile.threshold));
    init.set_root_margin(group.profile.root_margin);

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    // the observer keeps calling back for the lifetime of the page
    callback.forget();
    Ok(observer)
}

fn watch_id(element: &Element) -> Option<WatchId> {
    element.get_attribute(WATCH_ID_ATTR)?.parse().ok()
}

fn hide(element: &HtmlElement, entrance: Entrance) {
    let _ = element.class_list().add_1("fade-in");
    let style = element.style();
    let _ = style.set_property("opacity", "0");
    let _ = style.set_property("transform", entrance.hidden_transform());
    let _ = style.set_property("transition", TRANSITION);
}

fn show(element: &HtmlElement, entrance: Entrance) {
    let _ = element.class_list().add_2("visible", "animated");
    let style = element.style();
    let _ = style.set_property("opacity", "1");
    let _ = style.set_property("transform", entrance.shown_transform());
}

fn apply_all(plans: Vec<RevealPlan<RevealTarget>>) {
    for plan in plans {
        apply(plan);
    }
}

fn apply(plan: RevealPlan<RevealTarget>) {
    log::debug!("Revealing target {}", plan.id);
    let RevealTarget { element, number, .. } = plan.target;

    if plan.immediate {
        let _ = element.style().set_property("transition", "none");
        show(&element, plan.entrance);
        if let (Some(number), Some(counter)) = (number, plan.counter) {
            let format = CounterFormat::from_text(&number.text_content().unwrap_or_default());
            number.set_text_content(Some(&format.render(counter.target)));
        }
        return;
    }

    let entrance = plan.entrance;
    let counter = plan.counter;
    Timeout::new(plan.delay_ms, move || {
        show(&element, entrance);
        if let (Some(number), Some(counter)) = (number, counter) {
            count_up(number, counter);
        }
    })
    .forget();
}

fn count_up(number: HtmlElement, plan: CounterPlan) {
    let format = CounterFormat::from_text(&number.text_content().unwrap_or_default());
    let tween = CounterTween::new(plan.target, plan.duration_ms);

    Timeout::new(plan.start_after_ms, move || {
        let _ = number.class_list().add_1("counting");
        let el = number.clone();
        let fallback = format.render(tween.target());
        let scheduled = run_frames(move |elapsed| {
            el.set_text_content(Some(&format.render(tween.advance(elapsed))));
            !tween.is_finished(elapsed)
        });
        if !scheduled {
            number.set_text_content(Some(&fallback));
        }
    })
    .forget();
}
