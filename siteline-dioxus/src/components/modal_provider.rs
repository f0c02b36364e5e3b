//! Application-wide modal stack.
//!
//! `ModalProvider` wraps the app and renders every dialog opened through
//! [`use_modal`] above the page, last opened on top.

use dioxus::prelude::*;
use siteline_core::{ModalError, ModalStack};

use super::Portal;

/// Handle to the nearest [`ModalProvider`]'s stack.
#[derive(Clone, Copy)]
pub struct ModalHandle {
    stack: Signal<ModalStack<Element>>,
}

impl ModalHandle {
    /// Push `content` on top of the stack.
    pub fn open_modal(&mut self, content: Element) {
        self.stack.write().open(content);
        log::debug!("Modal opened, depth {}", self.stack.peek().len());
    }

    /// Remove the most recently opened modal. No-op on an empty stack.
    pub fn close_modal(&mut self) {
        if self.stack.write().close().is_none() {
            log::debug!("close_modal called with no open modal");
        }
    }

    pub fn close_all_modals(&mut self) {
        let closed = self.stack.write().close_all();
        log::debug!("Closed {closed} modal(s)");
    }

    /// Number of open modals. Subscribes the caller to changes.
    pub fn depth(&self) -> usize {
        self.stack.read().len()
    }
}

#[component]
pub fn ModalProvider(children: Element) -> Element {
    let stack = use_signal(ModalStack::new);
    use_context_provider(|| ModalHandle { stack });
    let stack = stack.read();

    rsx! {
        {children}
        if !stack.is_empty() {
            Portal {
                for (key, entry) in stack.iter_keyed() {
                    div {
                        key: "{key}",
                        "data-modal-key": "{key}",
                        {entry.clone()}
                    }
                }
            }
        }
    }
}

/// The nearest [`ModalProvider`], or [`ModalError::MissingProvider`] outside
/// of one.
pub fn try_use_modal() -> Result<ModalHandle, ModalError> {
    try_use_context::<ModalHandle>().ok_or(ModalError::MissingProvider)
}

/// The nearest [`ModalProvider`].
///
/// # Panics
///
/// Panics with "useModal must be used within a ModalProvider" when called
/// outside of a provider. Use [`try_use_modal`] to handle that case.
#[must_use]
pub fn use_modal() -> ModalHandle {
    match try_use_modal() {
        Ok(handle) => handle,
        Err(err) => {
            log::error!("{err}");
            panic!("{err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use dioxus::dioxus_core::VirtualDom;

    use super::*;

    thread_local! {
        static LOOKUP: RefCell<Option<Result<(), ModalError>>> = const { RefCell::new(None) };
    }

    #[component]
    fn RecordLookup() -> Element {
        let result = try_use_modal().map(|_| ());
        LOOKUP.with_borrow_mut(|slot| *slot = Some(result));
        rsx! {}
    }

    fn lookup_in(app: fn() -> Element) -> Result<(), ModalError> {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        LOOKUP.with_borrow_mut(Option::take).expect("component rendered")
    }

    #[test]
    fn lookup_outside_provider_fails_with_message() {
        let err = lookup_in(RecordLookup).expect_err("no provider");
        assert_eq!(err, ModalError::MissingProvider);
        assert_eq!(err.to_string(), "useModal must be used within a ModalProvider");
    }

    #[test]
    fn lookup_inside_provider_succeeds() {
        fn app() -> Element {
            rsx! {
                ModalProvider { RecordLookup {} }
            }
        }
        assert_eq!(lookup_in(app), Ok(()));
    }

    #[test]
    fn empty_provider_renders_only_children() {
        fn app() -> Element {
            rsx! {
                ModalProvider { p { "Projects" } }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
        let html = dioxus_ssr::render(&dom);
        assert!(html.contains("Projects"));
        assert!(!html.contains("portal-container"));
    }
}
