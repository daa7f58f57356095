use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> bool {
    web_sys::window()
        .and_then(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()).ok())
        .is_some()
}

/// Calls `step` once per animation frame with the milliseconds elapsed since
/// the first frame, until it returns `false`. Returns `false` when no frame
/// could be scheduled at all.
pub fn run_frames<F>(mut step: F) -> bool
where
    F: FnMut(f64) -> bool + 'static,
{
    let handle: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = handle.clone();
    let mut started_at: Option<f64> = None;

    *handle.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let start = *started_at.get_or_insert(now);
        let keep_going = step(now - start);

        let scheduled = keep_going
            && next
                .borrow()
                .as_ref()
                .map(request_frame)
                .unwrap_or(false);
        if !scheduled {
            // releases the closure once this frame returns
            let _ = next.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));

    let first = handle.borrow().as_ref().map(request_frame).unwrap_or(false);
    if !first {
        log::warn!("requestAnimationFrame unavailable, animation skipped");
        let _ = handle.borrow_mut().take();
    }
    first
}
