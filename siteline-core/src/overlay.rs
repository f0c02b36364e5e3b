//! Single dialog lifecycle.
//!
//! An [`Overlay`] is driven by an externally owned `is_open` flag through
//! [`Overlay::sync`]. Its state machine has two states:
//!
//! ```text
//! Closed --sync(true)--> Open --sync(false) / teardown--> Closed
//! ```
//!
//! Opening records the focused element, locks body scroll, mounts through
//! the portal, focuses the dialog root and registers a document key
//! listener. Closing reverses every step and returns focus to the recorded
//! element if it is still in the document.
//!
//! The overlay never closes itself. Escape, backdrop clicks and the
//! close/cancel buttons call `on_close`; the owner flips its flag and syncs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dom::{Document, ListenerId, Markup, NodeId};
use crate::error::DomError;
use crate::focus;
use crate::portal::{PortalMount, PortalRoot};

/// Form field values collected on submit, keyed by element id.
pub type FormValues = BTreeMap<String, String>;

pub(crate) type CloseHandler = Box<dyn FnMut()>;
pub(crate) type SubmitHandler = Box<dyn FnMut(&FormValues) -> anyhow::Result<()>>;

pub(crate) const PART_ATTR: &str = "data-part";

/// Width class of the dialog form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OverlaySize {
    #[serde(rename = "sm")]
    Small,
    #[default]
    #[serde(rename = "md")]
    Medium,
    #[serde(rename = "lg")]
    Large,
    #[serde(rename = "xl")]
    ExtraLarge,
}

impl OverlaySize {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "sm",
            Self::Medium => "md",
            Self::Large => "lg",
            Self::ExtraLarge => "xl",
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Small => "max-w-sm",
            Self::Medium => "max-w-md",
            Self::Large => "max-w-lg",
            Self::ExtraLarge => "max-w-xl",
        }
    }
}

impl fmt::Display for OverlaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown overlay size '{0}', expected sm, md, lg or xl")]
pub struct ParseSizeError(String);

impl FromStr for OverlaySize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sm" => Ok(Self::Small),
            "md" => Ok(Self::Medium),
            "lg" => Ok(Self::Large),
            "xl" => Ok(Self::ExtraLarge),
            other => Err(ParseSizeError(other.to_string())),
        }
    }
}

/// Caller-supplied presentation of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayProps {
    pub title: String,
    pub submit_label: String,
    pub cancel_label: String,
    pub size: OverlaySize,
}

impl OverlayProps {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            submit_label: "Save".to_string(),
            cancel_label: "Cancel".to_string(),
            size: OverlaySize::default(),
        }
    }

    #[must_use]
    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    #[must_use]
    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: OverlaySize) -> Self {
        self.size = size;
        self
    }
}

/// Full dialog markup: backdrop, positioning layer and the sized form.
pub fn dialog_markup(props: &OverlayProps, body: &[Markup]) -> Markup {
    let header = Markup::element("div")
        .class("px-6 py-4 border-b border-gray-100 flex justify-between items-center")
        .child(
            Markup::element("h3")
                .attr("id", "modal-title")
                .class("text-lg font-semibold text-gray-900")
                .child(Markup::text(props.title.clone())),
        )
        .child(
            Markup::element("button")
                .attr("type", "button")
                .attr(PART_ATTR, "close")
                .attr("aria-label", "Close")
                .child(Markup::element("span").class("sr-only").child(Markup::text("Close"))),
        );

    let footer = Markup::element("div")
        .class("px-6 py-4 border-t border-gray-100 flex justify-end space-x-3")
        .child(
            Markup::element("button")
                .attr("type", "button")
                .attr(PART_ATTR, "cancel")
                .child(Markup::text(props.cancel_label.clone())),
        )
        .child(
            Markup::element("button")
                .attr("type", "submit")
                .attr(PART_ATTR, "submit")
                .child(Markup::text(props.submit_label.clone())),
        );

    let form = Markup::element("form")
        .attr("role", "form")
        .attr("data-testid", "modal-form")
        .class(format!(
            "relative {} w-full overflow-hidden rounded-lg bg-white text-left shadow-xl",
            props.size.css_class()
        ))
        .child(header)
        .child(
            Markup::element("div")
                .attr(PART_ATTR, "body")
                .class("p-6")
                .children(body.iter().cloned()),
        )
        .child(footer);

    Markup::element("div")
        .attr(PART_ATTR, "root")
        .attr("tabindex", "-1")
        .class("fixed inset-0 z-50")
        .child(
            Markup::element("div")
                .attr("role", "dialog")
                .attr("aria-modal", "true")
                .attr("aria-labelledby", "modal-title")
                .class("fixed inset-0 z-50 overflow-y-auto")
                .child(
                    Markup::element("div")
                        .attr(PART_ATTR, "backdrop")
                        .attr("data-testid", "modal-backdrop")
                        .attr("aria-hidden", "true")
                        .class("fixed inset-0 bg-black bg-opacity-50 backdrop-blur-sm"),
                )
                .child(
                    Markup::element("div")
                        .attr(PART_ATTR, "positioner")
                        .class("relative flex min-h-screen items-center justify-center p-4")
                        .child(form),
                ),
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
}

impl KeyInput {
    pub const fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub const fn escape() -> Self {
        Self::new(Key::Escape)
    }

    pub const fn tab() -> Self {
        Self::new(Key::Tab)
    }

    pub const fn shift_tab() -> Self {
        Self {
            key: Key::Tab,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    CloseRequested,
    FocusWrapped(NodeId),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// The handler returned an error; the dialog stays open.
    Failed(String),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    CloseRequested,
    Submitted(SubmitOutcome),
    /// Click landed inside the form and stopped there.
    Contained,
    Ignored,
}

/// Nodes of the rendered dialog, valid while open.
#[derive(Debug)]
struct Rendered {
    mount: PortalMount,
    root: NodeId,
    backdrop: NodeId,
    positioner: NodeId,
    form: NodeId,
    body: NodeId,
    close: NodeId,
    cancel: NodeId,
    submit: NodeId,
}

/// One dialog bound to an externally controlled open flag.
pub struct Overlay {
    props: OverlayProps,
    body: Vec<Markup>,
    phase: OverlayPhase,
    previous_focus: Option<NodeId>,
    listener: Option<ListenerId>,
    rendered: Option<Rendered>,
    on_close: CloseHandler,
    on_submit: SubmitHandler,
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("props", &self.props)
            .field("phase", &self.phase)
            .field("previous_focus", &self.previous_focus)
            .finish_non_exhaustive()
    }
}

impl Overlay {
    pub fn new<C, S>(props: OverlayProps, on_close: C, on_submit: S) -> Self
    where
        C: FnMut() + 'static,
        S: FnMut(&FormValues) -> anyhow::Result<()> + 'static,
    {
        Self {
            props,
            body: Vec::new(),
            phase: OverlayPhase::Closed,
            previous_focus: None,
            listener: None,
            rendered: None,
            on_close: Box::new(on_close),
            on_submit: Box::new(on_submit),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<Markup>) -> Self {
        self.body = body;
        self
    }

    #[inline]
    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.phase == OverlayPhase::Open
    }

    #[inline]
    pub fn props(&self) -> &OverlayProps {
        &self.props
    }

    /// Element that had focus right before the dialog opened.
    #[inline]
    pub fn previous_focus(&self) -> Option<NodeId> {
        self.previous_focus
    }

    pub fn root(&self) -> Option<NodeId> {
        self.rendered.as_ref().map(|r| r.root)
    }

    pub fn form(&self) -> Option<NodeId> {
        self.rendered.as_ref().map(|r| r.form)
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.rendered.as_ref().map(|r| r.backdrop)
    }

    pub fn body_node(&self) -> Option<NodeId> {
        self.rendered.as_ref().map(|r| r.body)
    }

    /// Replace the presentation, re-rendering in place while open.
    pub fn set_props(&mut self, doc: &mut Document, props: OverlayProps) -> Result<(), DomError> {
        self.props = props;
        self.rerender(doc)
    }

    /// Replace the body content, re-rendering in place while open.
    pub fn set_body(&mut self, doc: &mut Document, body: Vec<Markup>) -> Result<(), DomError> {
        self.body = body;
        self.rerender(doc)
    }

    /// Bring the dialog in line with the owner's open flag.
    pub fn sync(&mut self, doc: &mut Document, portal: &PortalRoot, is_open: bool) -> Result<(), DomError> {
        match (self.phase, is_open) {
            (OverlayPhase::Closed, true) => self.open(doc, portal),
            (OverlayPhase::Open, false) => {
                self.close(doc);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Release everything the dialog holds, as when its owner unmounts.
    pub fn teardown(&mut self, doc: &mut Document) {
        if self.is_open() {
            self.close(doc);
        }
    }

    fn open(&mut self, doc: &mut Document, portal: &PortalRoot) -> Result<(), DomError> {
        self.previous_focus = doc.active_element();
        doc.lock_scroll();

        let mount = portal.mount(doc);
        let rendered = match self.render(doc, mount) {
            Ok(rendered) => rendered,
            Err(err) => {
                doc.unlock_scroll();
                self.previous_focus = None;
                return Err(err);
            }
        };
        doc.focus(rendered.root);
        self.rendered = Some(rendered);
        self.listener = Some(doc.add_key_listener());
        self.phase = OverlayPhase::Open;
        log::debug!("Opened overlay '{}'", self.props.title);
        Ok(())
    }

    fn close(&mut self, doc: &mut Document) {
        if let Some(rendered) = self.rendered.take() {
            rendered.mount.unmount(doc);
        }
        if let Some(listener) = self.listener.take() {
            doc.remove_key_listener(listener);
        }
        doc.unlock_scroll();

        if let Some(previous) = self.previous_focus.take() {
            if doc.contains(previous) {
                doc.focus(previous);
            }
        }
        self.phase = OverlayPhase::Closed;
        log::debug!("Closed overlay '{}'", self.props.title);
    }

    fn render(&self, doc: &mut Document, mount: PortalMount) -> Result<Rendered, DomError> {
        let markup = dialog_markup(&self.props, &self.body);
        let root = match doc.build(mount.container(), &markup) {
            Ok(root) => root,
            Err(err) => {
                mount.unmount(doc);
                return Err(err);
            }
        };

        let part = |name: &str| doc.find_by_attr(root, PART_ATTR, name).unwrap_or(root);
        Ok(Rendered {
            backdrop: part("backdrop"),
            positioner: part("positioner"),
            form: doc.find_by_attr(root, "role", "form").unwrap_or(root),
            body: part("body"),
            close: part("close"),
            cancel: part("cancel"),
            submit: part("submit"),
            root,
            mount,
        })
    }

    fn rerender(&mut self, doc: &mut Document) -> Result<(), DomError> {
        let Some(previous) = self.rendered.take() else {
            return Ok(());
        };
        let had_focus = doc
            .active_element()
            .is_some_and(|active| doc.is_ancestor(previous.root, active));
        doc.discard(previous.root);

        // A failed render has already unmounted, so release the rest.
        let rendered = match self.render(doc, previous.mount) {
            Ok(rendered) => rendered,
            Err(err) => {
                log::error!("Re-render of overlay '{}' failed: {err}", self.props.title);
                self.close(doc);
                return Err(err);
            }
        };
        if had_focus {
            doc.focus(rendered.root);
        }
        self.rendered = Some(rendered);
        Ok(())
    }

    /// Handle a key delivered through the document listener.
    pub fn handle_key(&mut self, doc: &mut Document, input: KeyInput) -> KeyOutcome {
        let Some(root) = self.root() else {
            return KeyOutcome::Ignored;
        };
        match input.key {
            Key::Escape => {
                (self.on_close)();
                KeyOutcome::CloseRequested
            }
            Key::Tab => focus::trap_focus(doc, root, input.shift)
                .map_or(KeyOutcome::Ignored, KeyOutcome::FocusWrapped),
            Key::Enter | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Dispatch a click on `target`, bubbling toward the dialog root.
    pub fn click(&mut self, doc: &mut Document, target: NodeId) -> ClickOutcome {
        let Some(r) = self.rendered.as_ref() else {
            return ClickOutcome::Ignored;
        };
        let (root, form, backdrop, positioner) = (r.root, r.form, r.backdrop, r.positioner);
        let (close, cancel, submit) = (r.close, r.cancel, r.submit);

        let mut current = Some(target);
        while let Some(node) = current {
            if node == close || node == cancel {
                (self.on_close)();
                return ClickOutcome::CloseRequested;
            }
            if node == submit {
                return ClickOutcome::Submitted(self.submit(doc));
            }
            if node == form {
                return ClickOutcome::Contained;
            }
            if node == backdrop || node == positioner {
                (self.on_close)();
                return ClickOutcome::CloseRequested;
            }
            if node == root {
                break;
            }
            current = doc.parent(node);
        }
        ClickOutcome::Ignored
    }

    /// Intercept a form submission and hand the values to the handler.
    pub fn submit(&mut self, doc: &Document) -> SubmitOutcome {
        let Some(values) = self.form_values(doc) else {
            return SubmitOutcome::Ignored;
        };
        match (self.on_submit)(&values) {
            Ok(()) => SubmitOutcome::Accepted,
            Err(err) => {
                log::error!("Submit handler of overlay '{}' failed: {err:#}", self.props.title);
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    /// Values of every identified input, select and textarea in the form.
    pub fn form_values(&self, doc: &Document) -> Option<FormValues> {
        self.form().map(|form| collect_form_values(doc, form))
    }
}

pub(crate) fn collect_form_values(doc: &Document, form: NodeId) -> FormValues {
    doc.descendants(form)
        .into_iter()
        .filter(|&node| matches!(doc.tag(node), Some("input" | "select" | "textarea")))
        .filter_map(|node| {
            let id = doc.attr(node, "id")?;
            Some((id.to_string(), doc.value(node).to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    struct Harness {
        doc: Document,
        portal: PortalRoot,
        closes: Rc<Cell<usize>>,
        submits: Rc<RefCell<Vec<FormValues>>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                doc: Document::new(),
                portal: PortalRoot::default(),
                closes: Rc::new(Cell::new(0)),
                submits: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn overlay(&self, props: OverlayProps) -> Overlay {
            let closes = Rc::clone(&self.closes);
            let submits = Rc::clone(&self.submits);
            Overlay::new(
                props,
                move || closes.set(closes.get() + 1),
                move |values: &FormValues| {
                    submits.borrow_mut().push(values.clone());
                    Ok(())
                },
            )
            .with_body(vec![Markup::element("input").attr("id", "name").attr("value", "Depot")])
        }
    }

    #[test]
    fn size_parses_short_names() {
        assert_eq!("sm".parse::<OverlaySize>(), Ok(OverlaySize::Small));
        assert_eq!("xl".parse::<OverlaySize>(), Ok(OverlaySize::ExtraLarge));
        assert!("huge".parse::<OverlaySize>().is_err());
        assert_eq!(OverlaySize::default().css_class(), "max-w-md");
    }

    #[test]
    fn open_locks_scroll_and_focuses_root() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Add Project"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");

        assert!(overlay.is_open());
        assert_eq!(h.doc.body_style("overflow"), Some("hidden"));
        assert_eq!(h.doc.active_element(), overlay.root());
        assert_eq!(h.doc.key_listener_count(), 1);
        assert!(h.portal.is_mounted(&h.doc));
    }

    #[test]
    fn close_restores_everything() {
        let mut h = Harness::new();
        let body = h.doc.body();
        let trigger = h.doc.build(body, &Markup::element("button")).expect("build");
        assert!(h.doc.focus(trigger));

        let mut overlay = h.overlay(OverlayProps::new("Add Project"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");
        assert_eq!(overlay.previous_focus(), Some(trigger));
        overlay.sync(&mut h.doc, &h.portal, false).expect("close");

        assert_eq!(overlay.phase(), OverlayPhase::Closed);
        assert_eq!(h.doc.body_style("overflow"), None);
        assert_eq!(h.doc.key_listener_count(), 0);
        assert_eq!(h.doc.active_element(), Some(trigger));
        assert!(!h.portal.is_mounted(&h.doc));
        assert!(h.doc.find_text("Add Project").is_none());
    }

    #[test]
    fn focus_is_not_restored_to_removed_element() {
        let mut h = Harness::new();
        let body = h.doc.body();
        let trigger = h.doc.build(body, &Markup::element("button")).expect("build");
        assert!(h.doc.focus(trigger));

        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");
        h.doc.remove_child(body, trigger).expect("remove");
        overlay.sync(&mut h.doc, &h.portal, false).expect("close");

        assert_eq!(h.doc.active_element(), None);
    }

    #[test]
    fn repeated_sync_is_idempotent() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");
        let root = overlay.root();
        overlay.sync(&mut h.doc, &h.portal, true).expect("open again");

        assert_eq!(overlay.root(), root);
        assert_eq!(h.doc.key_listener_count(), 1);
    }

    #[test]
    fn teardown_while_open_releases_resources() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");
        overlay.teardown(&mut h.doc);

        assert!(!overlay.is_open());
        assert_eq!(h.doc.key_listener_count(), 0);
        assert_eq!(h.doc.body_style("overflow"), None);
        assert!(!h.portal.is_mounted(&h.doc));
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        assert_eq!(overlay.handle_key(&mut h.doc, KeyInput::escape()), KeyOutcome::Ignored);
        assert_eq!(h.closes.get(), 0);
    }

    #[test]
    fn close_and_cancel_buttons_request_close() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit").with_cancel_label("Dismiss"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");

        let cancel = h.doc.find_text("Dismiss").expect("cancel button");
        assert_eq!(overlay.click(&mut h.doc, cancel), ClickOutcome::CloseRequested);
        let close = h.doc.find_text("Close").expect("close label");
        assert_eq!(overlay.click(&mut h.doc, close), ClickOutcome::CloseRequested);
        assert_eq!(h.closes.get(), 2);
    }

    #[test]
    fn submit_button_collects_form_values() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit").with_submit_label("Create"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");

        let input = h.doc.get_element_by_id("name").expect("input");
        h.doc.set_value(input, "Harbour Bridge");
        let submit = h.doc.find_text("Create").expect("submit");

        assert_eq!(
            overlay.click(&mut h.doc, submit),
            ClickOutcome::Submitted(SubmitOutcome::Accepted)
        );
        let submits = h.submits.borrow();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].get("name").map(String::as_str), Some("Harbour Bridge"));
    }

    #[test]
    fn failing_submit_handler_keeps_dialog_open() {
        let mut doc = Document::new();
        let portal = PortalRoot::default();
        let mut overlay = Overlay::new(OverlayProps::new("Tender"), || {}, |_: &FormValues| {
            anyhow::bail!("Value must be in format $X.XM")
        });
        overlay.sync(&mut doc, &portal, true).expect("open");

        assert_eq!(
            overlay.submit(&doc),
            SubmitOutcome::Failed("Value must be in format $X.XM".to_string())
        );
        assert!(overlay.is_open());
        assert!(doc.find_text("Tender").is_some());
    }

    #[test]
    fn set_body_rerenders_in_place() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");

        overlay
            .set_body(&mut h.doc, vec![Markup::element("p").child(Markup::text("Please fill in all required fields"))])
            .expect("rerender");
        assert!(h.doc.find_text("Please fill in all required fields").is_some());
        assert_eq!(h.doc.active_element(), overlay.root());
        assert_eq!(
            h.doc.children(h.doc.get_element_by_id("portal-root").expect("root")).len(),
            1
        );
    }

    #[test]
    fn failed_rerender_closes_the_dialog() {
        let mut h = Harness::new();
        let mut overlay = h.overlay(OverlayProps::new("Edit"));
        overlay.sync(&mut h.doc, &h.portal, true).expect("open");

        let root = h.doc.get_element_by_id("portal-root").expect("root");
        h.doc.discard(root);
        assert!(overlay.set_props(&mut h.doc, OverlayProps::new("Edit again")).is_err());

        assert!(!overlay.is_open());
        assert_eq!(overlay.root(), None);
        assert_eq!(h.doc.key_listener_count(), 0);
        assert_eq!(h.doc.body_style("overflow"), None);
        assert_eq!(h.doc.scroll_lock_count(), 0);
    }
}
