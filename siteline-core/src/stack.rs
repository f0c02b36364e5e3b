//! Ordered collection of open modals.
//!
//! The stack only holds pre-built content. It knows nothing about focus,
//! scroll locking or key handling; the provider that renders it drives
//! those (see [`crate::provider`]).
//!
//! # Invariants
//!
//! - Entries are append-ordered: position is z-order, the last entry is
//!   topmost.
//! - Close ordering is strictly LIFO; entries are never reordered, spliced
//!   or mutated after being pushed.
//! - Because of the above, an entry's index is a stable identity for as long
//!   as the entry exists.
//!
//! # Failure Modes
//!
//! - `close()` on an empty stack returns `None`.
//! - `close_all()` on an empty stack returns `0`.

use std::fmt;

use crate::dom::Markup;
use crate::overlay::{dialog_markup, CloseHandler, FormValues, OverlayProps, SubmitHandler};

/// LIFO collection of modal content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalStack<T> {
    entries: Vec<T>,
}

impl<T> Default for ModalStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ModalStack<T> {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Push `content` on top. Unbounded.
    pub fn open(&mut self, content: T) {
        self.entries.push(content);
    }

    /// Remove the topmost entry.
    pub fn close(&mut self) -> Option<T> {
        self.entries.pop()
    }

    /// Remove every entry, returning how many were open.
    pub fn close_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&T> {
        self.entries.last()
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Entries bottom to top with their identity key.
    pub fn iter_keyed(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries.iter().enumerate()
    }
}

/// Renderable unit held by the modal stack.
///
/// The lifecycle hooks are called by the provider for the topmost entry.
/// `on_close` runs after the entry has already been popped, so it must not
/// close another modal itself.
pub trait ModalContent {
    fn markup(&self) -> Vec<Markup>;

    /// The user dismissed this entry (Escape, close, cancel or backdrop).
    fn on_close(&mut self) {}

    /// The entry's form was submitted with `values`.
    fn on_submit(&mut self, values: &FormValues) -> anyhow::Result<()> {
        let _ = values;
        Ok(())
    }
}

impl ModalContent for Markup {
    fn markup(&self) -> Vec<Markup> {
        vec![self.clone()]
    }
}

impl ModalContent for Vec<Markup> {
    fn markup(&self) -> Vec<Markup> {
        self.clone()
    }
}

/// A configured dialog pushed as stack content, with its own callbacks.
pub struct DialogContent {
    pub props: OverlayProps,
    pub body: Vec<Markup>,
    on_close: Option<CloseHandler>,
    on_submit: Option<SubmitHandler>,
}

impl fmt::Debug for DialogContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogContent")
            .field("props", &self.props)
            .field("body", &self.body)
            .field("on_close", &self.on_close.is_some())
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

impl DialogContent {
    pub fn new(props: OverlayProps, body: Vec<Markup>) -> Self {
        Self {
            props,
            body,
            on_close: None,
            on_submit: None,
        }
    }

    #[must_use]
    pub fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    #[must_use]
    pub fn with_on_submit(mut self, on_submit: impl FnMut(&FormValues) -> anyhow::Result<()> + 'static) -> Self {
        self.on_submit = Some(Box::new(on_submit));
        self
    }
}

impl ModalContent for DialogContent {
    fn markup(&self) -> Vec<Markup> {
        vec![dialog_markup(&self.props, &self.body)]
    }

    fn on_close(&mut self) {
        if let Some(on_close) = self.on_close.as_mut() {
            on_close();
        }
    }

    fn on_submit(&mut self, values: &FormValues) -> anyhow::Result<()> {
        match self.on_submit.as_mut() {
            Some(on_submit) => on_submit(values),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_removes_only_the_top() {
        let mut stack = ModalStack::new();
        stack.open("a");
        stack.open("b");
        assert_eq!(stack.close(), Some("b"));
        assert_eq!(stack.entries(), &["a"]);
    }

    #[test]
    fn close_on_empty_is_a_no_op() {
        let mut stack: ModalStack<&str> = ModalStack::new();
        assert_eq!(stack.close(), None);
        assert_eq!(stack.close_all(), 0);
        assert!(stack.is_empty());
    }

    #[test]
    fn close_all_empties_any_depth() {
        let mut stack = ModalStack::new();
        for depth in 0..5 {
            stack.open(depth);
        }
        assert_eq!(stack.close_all(), 5);
        assert!(stack.is_empty());
        assert_eq!(stack.top(), None);
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut stack = ModalStack::new();
        stack.open("first");
        stack.open("second");
        stack.open("third");
        stack.close();
        stack.open("fourth");

        let keyed: Vec<_> = stack.iter_keyed().collect();
        assert_eq!(keyed, vec![(0, &"first"), (1, &"second"), (2, &"fourth")]);
        assert_eq!(stack.top(), Some(&"fourth"));
    }

    #[test]
    fn dialog_content_renders_full_dialog() {
        let content = DialogContent::new(OverlayProps::new("Upload"), vec![Markup::text("Drawing set")]);
        let markup = content.markup();
        assert_eq!(markup.len(), 1);
        let Markup::Element { tag, .. } = &markup[0] else {
            panic!("expected element");
        };
        assert_eq!(tag, "div");
    }

    #[test]
    fn dialog_content_forwards_hooks() {
        use std::cell::Cell;
        use std::rc::Rc;

        let closed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&closed);
        let mut content = DialogContent::new(OverlayProps::new("Tender"), Vec::new())
            .with_on_close(move || flag.set(true))
            .with_on_submit(|values: &FormValues| {
                anyhow::ensure!(values.contains_key("value"), "Value is required");
                Ok(())
            });

        content.on_close();
        assert!(closed.get());
        let err = content.on_submit(&FormValues::new()).expect_err("missing value");
        assert_eq!(err.to_string(), "Value is required");

        let mut plain = Markup::text("Modal 1");
        assert!(plain.on_submit(&FormValues::new()).is_ok());
    }
}
