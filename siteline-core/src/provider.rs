//! Modal stack provider and its scoped accessor.
//!
//! A [`ModalProvider`] owns one shared [`ModalStack`] and renders it through
//! a single portal container. Code running inside [`ModalProvider::scope`]
//! reaches the stack with [`use_modal`]; outside any scope the accessor
//! fails with [`ModalError::MissingProvider`] instead of handing out a
//! detached stack, so a missing provider shows up at the first call.
//!
//! While at least one entry is rendered the provider holds one scroll lock
//! and one key listener. Keys and clicks reach only the topmost entry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dom::{Document, ListenerId, Markup, NodeId};
use crate::error::{DomError, ModalError};
use crate::focus;
use crate::overlay::{collect_form_values, ClickOutcome, Key, KeyInput, KeyOutcome, SubmitOutcome, PART_ATTR};
use crate::portal::{PortalMount, PortalRoot};
use crate::stack::{ModalContent, ModalStack};

type SharedContent = Rc<RefCell<dyn ModalContent>>;

struct Entry {
    serial: u64,
    content: SharedContent,
}

#[derive(Default)]
struct Shared {
    stack: ModalStack<Entry>,
    next_serial: u64,
}

thread_local! {
    static PROVIDERS: RefCell<Vec<ModalHandle>> = const { RefCell::new(Vec::new()) };
}

/// Capability to push and pop modals on a provider's stack.
#[derive(Clone)]
pub struct ModalHandle {
    shared: Rc<RefCell<Shared>>,
}

impl fmt::Debug for ModalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalHandle").field("depth", &self.depth()).finish()
    }
}

impl ModalHandle {
    pub fn open_modal(&self, content: impl ModalContent + 'static) {
        let mut shared = self.shared.borrow_mut();
        let serial = shared.next_serial;
        shared.next_serial += 1;
        let content: SharedContent = Rc::new(RefCell::new(content));
        shared.stack.open(Entry { serial, content });
    }

    pub fn close_modal(&self) {
        self.shared.borrow_mut().stack.close();
    }

    pub fn close_all_modals(&self) {
        self.shared.borrow_mut().stack.close_all();
    }

    pub fn depth(&self) -> usize {
        self.shared.borrow().stack.len()
    }

    /// Whether both handles drive the same stack.
    pub fn same_stack(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    fn top(&self) -> Option<(u64, SharedContent)> {
        let shared = self.shared.borrow();
        shared.stack.top().map(|entry| (entry.serial, Rc::clone(&entry.content)))
    }
}

/// A stack entry currently built into the portal container.
#[derive(Debug)]
struct Mounted {
    serial: u64,
    wrapper: NodeId,
    previous_focus: Option<NodeId>,
}

/// Owner of a modal stack and the portal container it renders into.
pub struct ModalProvider {
    handle: ModalHandle,
    portal: PortalRoot,
    mount: Option<PortalMount>,
    mounted: Vec<Mounted>,
    listener: Option<ListenerId>,
}

impl fmt::Debug for ModalProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalProvider")
            .field("portal", &self.portal)
            .field("mounted", &self.mount.is_some())
            .field("depth", &self.handle.depth())
            .field("rendered", &self.mounted.len())
            .finish()
    }
}

impl Default for ModalProvider {
    fn default() -> Self {
        Self::new(PortalRoot::default())
    }
}

impl ModalProvider {
    pub fn new(portal: PortalRoot) -> Self {
        Self {
            handle: ModalHandle {
                shared: Rc::new(RefCell::new(Shared::default())),
            },
            portal,
            mount: None,
            mounted: Vec::new(),
            listener: None,
        }
    }

    pub fn handle(&self) -> ModalHandle {
        self.handle.clone()
    }

    /// Acquire the provider's portal container. Idempotent.
    pub fn mount(&mut self, doc: &mut Document) {
        if self.mount.is_none() {
            self.mount = Some(self.portal.mount(doc));
        }
    }

    /// Release the portal container along with the scroll lock, the key
    /// listener and the focus taken by rendered entries.
    pub fn unmount(&mut self, doc: &mut Document) {
        let restore = self.mounted.first().and_then(|bottom| bottom.previous_focus);
        self.mounted.clear();
        if let Some(mount) = self.mount.take() {
            mount.unmount(doc);
        }
        self.release(doc);
        if let Some(previous) = restore.filter(|&node| doc.contains(node)) {
            doc.focus(previous);
        }
    }

    /// Bring the portal container in line with the stack, bottom to top,
    /// one keyed wrapper per entry.
    ///
    /// Entries still present keep their nodes. Removed entries are torn
    /// down from the top, each handing focus back to what was focused when
    /// it opened. New entries take focus as they are built.
    pub fn render(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let Some(container) = self.mount.as_ref().map(PortalMount::container) else {
            return Ok(());
        };

        let shared = self.handle.shared.borrow();
        let entries = shared.stack.entries();
        let kept = self
            .mounted
            .iter()
            .zip(entries)
            .take_while(|(mounted, entry)| mounted.serial == entry.serial)
            .count();

        while self.mounted.len() > kept {
            let Some(removed) = self.mounted.pop() else {
                break;
            };
            doc.discard(removed.wrapper);
            if let Some(previous) = removed.previous_focus.filter(|&node| doc.contains(node)) {
                doc.focus(previous);
            }
        }

        for (key, entry) in shared.stack.iter_keyed().skip(kept) {
            let previous_focus = doc.active_element();
            let wrapper = Markup::element("div")
                .attr("data-modal-key", key.to_string())
                .children(entry.content.borrow().markup());
            let wrapper = doc.build(container, &wrapper)?;
            let root = doc.find_by_attr(wrapper, PART_ATTR, "root").unwrap_or(wrapper);
            doc.focus(root);
            self.mounted.push(Mounted {
                serial: entry.serial,
                wrapper,
                previous_focus,
            });
        }
        drop(shared);

        if self.mounted.is_empty() {
            self.release(doc);
        } else if self.listener.is_none() {
            doc.lock_scroll();
            self.listener = Some(doc.add_key_listener());
        }
        Ok(())
    }

    /// Route a key to the topmost entry: Escape dismisses it, Tab stays
    /// inside it.
    pub fn handle_key(&mut self, doc: &mut Document, input: KeyInput) -> KeyOutcome {
        let Some((wrapper, _)) = self.top() else {
            return KeyOutcome::Ignored;
        };
        match input.key {
            Key::Escape => {
                self.dismiss_top(doc);
                KeyOutcome::CloseRequested
            }
            Key::Tab => focus::trap_focus(doc, wrapper, input.shift)
                .map_or(KeyOutcome::Ignored, KeyOutcome::FocusWrapped),
            Key::Enter | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Dispatch a click on `target`. Entries below the top are inert.
    pub fn click(&mut self, doc: &mut Document, target: NodeId) -> ClickOutcome {
        let Some((wrapper, _)) = self.top() else {
            return ClickOutcome::Ignored;
        };
        if !doc.is_ancestor(wrapper, target) {
            return ClickOutcome::Ignored;
        }

        let mut current = Some(target);
        while let Some(node) = current {
            if node == wrapper {
                break;
            }
            match doc.attr(node, PART_ATTR) {
                Some("close" | "cancel") => {
                    self.dismiss_top(doc);
                    return ClickOutcome::CloseRequested;
                }
                Some("submit") => return ClickOutcome::Submitted(self.submit(doc)),
                _ if doc.attr(node, "role") == Some("form") => return ClickOutcome::Contained,
                Some("backdrop" | "positioner") => {
                    self.dismiss_top(doc);
                    return ClickOutcome::CloseRequested;
                }
                _ => current = doc.parent(node),
            }
        }
        ClickOutcome::Ignored
    }

    /// Submit the topmost entry's form to its `on_submit` hook.
    ///
    /// The hook may push or pop modals through a [`ModalHandle`]; the
    /// container is re-rendered afterwards.
    pub fn submit(&mut self, doc: &mut Document) -> SubmitOutcome {
        let Some((wrapper, content)) = self.top() else {
            return SubmitOutcome::Ignored;
        };
        let Some(form) = doc.find_by_attr(wrapper, "role", "form") else {
            return SubmitOutcome::Ignored;
        };
        let values = collect_form_values(doc, form);

        let result = content.borrow_mut().on_submit(&values);
        let outcome = match result {
            Ok(()) => SubmitOutcome::Accepted,
            Err(err) => {
                log::error!("Submit handler of stacked modal failed: {err:#}");
                SubmitOutcome::Failed(err.to_string())
            }
        };
        self.refresh(doc);
        outcome
    }

    /// Wrapper and content of the topmost entry, when it is rendered.
    fn top(&self) -> Option<(NodeId, SharedContent)> {
        let (serial, content) = self.handle.top()?;
        let mounted = self.mounted.last()?;
        if mounted.serial != serial {
            log::debug!("Modal stack changed since the last render");
            return None;
        }
        Some((mounted.wrapper, content))
    }

    /// Pop exactly one entry, tell it, and re-render.
    fn dismiss_top(&mut self, doc: &mut Document) {
        let popped = self.handle.shared.borrow_mut().stack.close();
        if let Some(entry) = popped {
            entry.content.borrow_mut().on_close();
        }
        self.refresh(doc);
    }

    fn refresh(&mut self, doc: &mut Document) {
        if let Err(err) = self.render(doc) {
            log::error!("Failed to render modal stack: {err}");
        }
    }

    fn release(&mut self, doc: &mut Document) {
        if let Some(listener) = self.listener.take() {
            doc.remove_key_listener(listener);
            doc.unlock_scroll();
        }
    }

    /// Run `f` with this provider installed as the innermost one.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        PROVIDERS.with_borrow_mut(|providers| providers.push(self.handle()));
        let _guard = ScopeGuard;
        f()
    }
}

/// Pops the innermost provider, including during unwinding.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        PROVIDERS.with_borrow_mut(|providers| {
            providers.pop();
        });
    }
}

/// The innermost provider's stack handle.
pub fn use_modal() -> Result<ModalHandle, ModalError> {
    PROVIDERS
        .with_borrow(|providers| providers.last().cloned())
        .ok_or(ModalError::MissingProvider)
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[test]
    fn accessor_outside_provider_fails_fast() {
        let err = use_modal().expect_err("no provider installed");
        assert_eq!(err, ModalError::MissingProvider);
        assert_eq!(err.to_string(), "useModal must be used within a ModalProvider");
    }

    #[test]
    fn accessor_inside_scope_reaches_the_provider() {
        let provider = ModalProvider::default();
        provider.scope(|| {
            let modal = use_modal().expect("inside provider");
            modal.open_modal(Markup::text("Modal 1"));
        });
        assert_eq!(provider.handle().depth(), 1);
        assert!(use_modal().is_err());
    }

    #[test]
    fn nested_scopes_shadow_outer_provider() {
        let outer = ModalProvider::default();
        let inner = ModalProvider::default();
        outer.scope(|| {
            inner.scope(|| {
                let modal = use_modal().expect("inner");
                assert!(modal.same_stack(&inner.handle()));
            });
            let modal = use_modal().expect("outer");
            assert!(modal.same_stack(&outer.handle()));
        });
    }

    #[test]
    fn scope_is_restored_after_panic() {
        let provider = ModalProvider::default();
        let result = catch_unwind(AssertUnwindSafe(|| {
            provider.scope(|| panic!("page render failed"));
        }));
        assert!(result.is_err());
        assert!(use_modal().is_err());
    }

    #[test]
    fn render_wraps_entries_in_keyed_containers() {
        let mut doc = Document::new();
        let mut provider = ModalProvider::default();
        provider.mount(&mut doc);
        let modal = provider.handle();

        modal.open_modal(Markup::text("Modal 1"));
        modal.open_modal(Markup::text("Modal 2"));
        provider.render(&mut doc).expect("render");

        let first = doc.find_text("Modal 1").expect("first");
        let second = doc.find_text("Modal 2").expect("second");
        assert_eq!(doc.attr(first, "data-modal-key"), Some("0"));
        assert_eq!(doc.attr(second, "data-modal-key"), Some("1"));

        modal.close_modal();
        provider.render(&mut doc).expect("render");
        assert!(doc.find_text("Modal 2").is_none());
        assert!(doc.find_text("Modal 1").is_some());
    }

    #[test]
    fn unmount_removes_portal_root() {
        let mut doc = Document::new();
        let portal = PortalRoot::default();
        let mut provider = ModalProvider::new(portal.clone());
        provider.mount(&mut doc);
        provider.mount(&mut doc);
        assert!(portal.is_mounted(&doc));

        provider.unmount(&mut doc);
        assert!(!portal.is_mounted(&doc));
    }
}
