use std::cell::RefCell;

use gloo_timers::callback::Timeout;
use web_sys::Element;
use yew::prelude::*;
use yew::AppHandle;

use crate::contact::submission::NotificationKind;
use crate::dom;

pub const AUTO_DISMISS_MS: u32 = 5000;
pub const SLIDE_OUT_MS: u32 = 300;

/// The one toast on screen, keyed by its host so a late dismiss of an
/// already replaced toast is a no-op.
pub struct ActiveToast<K, H> {
    current: Option<(K, H)>,
}

impl<K: PartialEq, H> Default for ActiveToast<K, H> {
    fn default() -> Self {
        ActiveToast { current: None }
    }
}

impl<K: PartialEq, H> ActiveToast<K, H> {
    /// Makes `key` the active toast and returns the one it replaces.
    pub fn replace(&mut self, key: K, handle: H) -> Option<(K, H)> {
        self.current.replace((key, handle))
    }

    /// Takes the active toast if it is still `key`.
    pub fn release(&mut self, key: &K) -> Option<(K, H)> {
        match &self.current {
            Some((active, _)) if active == key => self.current.take(),
            _ => None,
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<ActiveToast<Element, AppHandle<Toast>>> = RefCell::new(ActiveToast::default());
}

fn unmount((host, handle): (Element, AppHandle<Toast>)) {
    handle.destroy();
    host.remove();
}

/// Unmounts the toast living in `host` once it has slid out.
fn dismissed(host: &Element) {
    let released = ACTIVE.with(|active| active.borrow_mut().release(host));
    match released {
        Some(toast) => unmount(toast),
        None => host.remove(),
    }
}

pub fn icon_class(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "fas fa-check-circle",
        NotificationKind::Error => "fas fa-exclamation-circle",
        NotificationKind::Info => "fas fa-info-circle",
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: String,
    pub kind: NotificationKind,
    /// Element the toast is mounted in; removed once the toast has slid out.
    pub host: Element,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let leaving = use_state(|| false);

    let dismiss = {
        let leaving = leaving.setter();
        let host = props.host.clone();
        Callback::from(move |_: ()| {
            leaving.set(true);
            let host = host.clone();
            Timeout::new(SLIDE_OUT_MS, move || dismissed(&host)).forget();
        })
    };

    {
        let dismiss = dismiss.clone();
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(AUTO_DISMISS_MS, move || dismiss.emit(()));
                move || drop(timeout)
            },
            (),
        );
    }

    let on_close = {
        let dismiss = dismiss.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(()))
    };

    let style = if *leaving {
        format!("transform: translateX(100%); opacity: 0; transition: all {}ms ease;", SLIDE_OUT_MS)
    } else {
        String::new()
    };

    html! {
        <div
            class={classes!(
                "notification__content",
                format!("notification--{}", props.kind.class_suffix()),
                leaving.then_some("notification--leaving"),
            )}
            role="status"
            style={style}
        >
            <i class={icon_class(props.kind)}></i>
            <span class="notification__message">{ &props.message }</span>
            <button class="notification__close" aria-label="Cerrar" onclick={on_close}>
                <i class="fas fa-times"></i>
            </button>
        </div>
    }
}

/// Replaces any toast on screen with a new one.
pub fn show_notification(message: &str, kind: NotificationKind) {
    let Some(document) = dom::document() else {
        return;
    };
    for existing in dom::query_all(&document, ".notification") {
        existing.remove();
    }
    let (Ok(host), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    host.set_class_name("notification");
    if body.append_child(&host).is_err() {
        log::warn!("Could not mount notification");
        return;
    }
    let handle = yew::Renderer::<Toast>::with_root_and_props(
        host.clone(),
        ToastProps {
            message: message.to_string(),
            kind,
            host: host.clone(),
        },
    )
    .render();
    let previous = ACTIVE.with(|active| active.borrow_mut().replace(host, handle));
    if let Some(previous) = previous {
        unmount(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_its_own_icon() {
        let icons = [
            icon_class(NotificationKind::Success),
            icon_class(NotificationKind::Error),
            icon_class(NotificationKind::Info),
        ];
        assert_eq!(icons[0], "fas fa-check-circle");
        assert_ne!(icons[0], icons[1]);
        assert_ne!(icons[1], icons[2]);
    }

    #[test]
    fn a_new_toast_hands_back_the_one_it_replaces() {
        let mut active: ActiveToast<&str, u32> = ActiveToast::default();
        assert!(active.replace("first", 1).is_none());
        assert_eq!(active.replace("second", 2), Some(("first", 1)));

        // the replaced toast's own dismiss timer must not take the new one
        assert!(active.release(&"first").is_none());
        assert_eq!(active.release(&"second"), Some(("second", 2)));
        assert!(active.release(&"second").is_none());
    }

    #[test]
    fn slide_out_fits_inside_the_display_window() {
        assert!(SLIDE_OUT_MS < AUTO_DISMISS_MS);
    }
}
