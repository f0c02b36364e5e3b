//! Base modal dialog.
//!
//! Every dialog in the dashboard is a `BaseModal`: a portaled overlay with a
//! backdrop, a titled form, and cancel/submit buttons. While open it locks
//! page scroll, traps Tab inside the dialog, and closes on Escape or on a
//! press outside the form. Focus returns to the previously focused element
//! when it closes.

use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::prelude::*;
use siteline_core::focus::trap_tab;
use siteline_core::{Key as OverlayKey, KeyInput, OverlaySize};

use super::Portal;
use crate::hooks::use_overlay_settings;
use crate::script;

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(0);

/// Map a webview key event onto the keys dialogs react to.
fn key_input(key: &Key, shift: bool) -> KeyInput {
    let key = match key {
        Key::Escape => OverlayKey::Escape,
        Key::Tab => OverlayKey::Tab,
        Key::Enter => OverlayKey::Enter,
        _ => OverlayKey::Other,
    };
    KeyInput { key, shift }
}

/// Index to focus for a Tab press, given what the webview reports.
fn next_focus(state: script::FocusState, shift: bool) -> Option<usize> {
    trap_tab(state.len, state.active, shift).resolve(state.len, state.active, shift)
}

/// Modal dialog rendered through a [`Portal`].
///
/// Nothing is rendered while `is_open` is false. `on_submit` runs for each
/// form submission with the default navigation suppressed; an error keeps
/// the dialog open and is logged.
#[component]
pub fn BaseModal(
    is_open: bool,
    on_close: EventHandler<()>,
    #[props(into)] title: String,
    on_submit: Callback<FormEvent, anyhow::Result<()>>,
    #[props(into, default = "Save".to_string())] submit_text: String,
    #[props(into, default = "Cancel".to_string())] cancel_text: String,
    size: Option<OverlaySize>,
    children: Element,
) -> Element {
    let settings = use_overlay_settings();

    if !is_open {
        return rsx! {};
    }

    let size = size.unwrap_or(settings.default_size);

    rsx! {
        Portal {
            DialogSurface {
                on_close,
                title,
                on_submit,
                submit_text,
                cancel_text,
                size,
                {children}
            }
        }
    }
}

/// The mounted dialog. Mounting opens it, unmounting closes it.
#[component]
fn DialogSurface(
    on_close: EventHandler<()>,
    title: String,
    on_submit: Callback<FormEvent, anyhow::Result<()>>,
    submit_text: String,
    cancel_text: String,
    size: OverlaySize,
    children: Element,
) -> Element {
    let dialog_id = use_hook(|| {
        let id = NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed);
        format!("overlay-{id}")
    });

    use_effect({
        let dialog_id = dialog_id.clone();
        move || {
            log::debug!("Opening dialog '{dialog_id}'");
            script::open(&dialog_id);
        }
    });

    use_drop({
        let dialog_id = dialog_id.clone();
        move || {
            log::debug!("Closing dialog '{dialog_id}'");
            script::close(&dialog_id);
        }
    });

    let onkeydown = {
        let dialog_id = dialog_id.clone();
        move |evt: KeyboardEvent| {
            let input = key_input(&evt.key(), evt.modifiers().shift());
            match input.key {
                OverlayKey::Escape => {
                    evt.prevent_default();
                    on_close.call(());
                }
                OverlayKey::Tab => {
                    // The webview moves focus before an async check could
                    // cancel it, so every Tab is handled here.
                    evt.prevent_default();
                    let dialog_id = dialog_id.clone();
                    spawn(async move {
                        match script::focus_state(&dialog_id).await {
                            Ok(state) => {
                                if let Some(index) = next_focus(state, input.shift) {
                                    script::focus_at(&dialog_id, index);
                                }
                            }
                            Err(err) => log::warn!("Focus trap query failed for '{dialog_id}': {err}"),
                        }
                    });
                }
                OverlayKey::Enter | OverlayKey::Other => {}
            }
        }
    };

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if let Err(err) = on_submit.call(evt) {
            log::error!("Dialog submit failed: {err:#}");
        }
    };

    let form_class = format!(
        "modal-form relative {} w-full overflow-hidden rounded-lg bg-white text-left shadow-xl",
        size.css_class()
    );

    rsx! {
        div {
            id: "{dialog_id}",
            class: "modal-root fixed inset-0 z-50",
            tabindex: -1,
            onkeydown,

            div {
                role: "dialog",
                "aria-modal": "true",
                "aria-labelledby": "modal-title",
                class: "fixed inset-0 z-50 overflow-y-auto",

                div {
                    class: "modal-backdrop fixed inset-0 bg-black bg-opacity-50 backdrop-blur-sm",
                    "data-testid": "modal-backdrop",
                    "aria-hidden": "true",
                    onmousedown: move |_| on_close.call(()),
                }

                div {
                    class: "modal-positioner relative flex min-h-screen items-center justify-center p-4",
                    onmousedown: move |_| on_close.call(()),

                    form {
                        role: "form",
                        "data-testid": "modal-form",
                        class: "{form_class}",
                        onmousedown: move |evt| evt.stop_propagation(),
                        onsubmit,

                        div {
                            class: "modal-header px-6 py-4 border-b border-gray-100 flex justify-between items-center",
                            h3 {
                                id: "modal-title",
                                class: "text-lg font-semibold text-gray-900",
                                "{title}"
                            }
                            button {
                                r#type: "button",
                                class: "modal-close",
                                "aria-label": "Close",
                                onclick: move |_| on_close.call(()),
                                span { class: "sr-only", "Close" }
                                "\u{00d7}"
                            }
                        }

                        div {
                            class: "modal-body p-6",
                            {children}
                        }

                        div {
                            class: "modal-footer px-6 py-4 border-t border-gray-100 flex justify-end space-x-3",
                            button {
                                r#type: "button",
                                class: "btn btn-secondary",
                                onclick: move |_| on_close.call(()),
                                "{cancel_text}"
                            }
                            button {
                                r#type: "submit",
                                class: "btn btn-primary",
                                "{submit_text}"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use dioxus::dioxus_core::VirtualDom;

    use super::*;
    use script::FocusState;

    fn render(app: fn() -> Element) -> String {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn keys_map_onto_overlay_keys() {
        assert_eq!(key_input(&Key::Escape, false), KeyInput::escape());
        assert_eq!(key_input(&Key::Tab, true), KeyInput::shift_tab());
        assert_eq!(key_input(&Key::Character("a".into()), false).key, OverlayKey::Other);
    }

    #[test]
    fn tab_wraps_at_both_ends() {
        let last = FocusState { len: 4, active: Some(3) };
        assert_eq!(next_focus(last, false), Some(0));
        let first = FocusState { len: 4, active: Some(0) };
        assert_eq!(next_focus(first, true), Some(3));
    }

    #[test]
    fn tab_moves_within_the_dialog() {
        let middle = FocusState { len: 4, active: Some(1) };
        assert_eq!(next_focus(middle, false), Some(2));
        assert_eq!(next_focus(middle, true), Some(0));
    }

    #[test]
    fn focus_on_dialog_root_enters_at_matching_end() {
        let outside = FocusState { len: 3, active: None };
        assert_eq!(next_focus(outside, false), Some(0));
        assert_eq!(next_focus(outside, true), Some(2));
        assert_eq!(next_focus(FocusState::default(), false), None);
    }

    #[test]
    fn closed_modal_renders_nothing() {
        fn app() -> Element {
            rsx! {
                BaseModal {
                    is_open: false,
                    on_close: |()| {},
                    title: "Add Project",
                    on_submit: |_: FormEvent| -> anyhow::Result<()> { Ok(()) },
                    p { "Test Content" }
                }
            }
        }

        let html = render(app);
        assert!(!html.contains("Add Project"));
        assert!(!html.contains("Test Content"));
        assert!(!html.contains("modal-backdrop"));
    }

    #[test]
    fn open_modal_renders_backdrop_outside_the_form() {
        fn app() -> Element {
            rsx! {
                BaseModal {
                    is_open: true,
                    on_close: |()| {},
                    title: "Add Project",
                    submit_text: "Create",
                    on_submit: |_: FormEvent| -> anyhow::Result<()> { Ok(()) },
                    p { "Test Content" }
                }
            }
        }

        let html = render(app);
        for expected in ["Add Project", "Test Content", "Create", "Cancel", "max-w-md", r#"aria-modal="true""#] {
            assert!(html.contains(expected), "missing {expected} in {html}");
        }
        let backdrop = html.find("modal-backdrop").expect("backdrop");
        let positioner = html.find("modal-positioner").expect("positioner");
        let form = html.find(r#"role="form""#).expect("form");
        assert!(backdrop < positioner && positioner < form);
        assert!(html.contains("portal-container"));
    }
}
