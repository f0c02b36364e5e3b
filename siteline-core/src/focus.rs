//! Keyboard focus trap.
//!
//! The focusable set is queried from the live subtree every time Tab is
//! pressed. Dialog content changes under the trap (an error banner appears,
//! a field gets disabled), so nothing here is cached.

use crate::dom::{Document, NodeId};

/// What a Tab press inside a trapped region should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapStep {
    /// Suppress the default move and focus the element at this index.
    Wrap(usize),
    /// Let the platform move focus.
    Native,
}

impl TrapStep {
    /// Index focus ends up at, for hosts that always intercept Tab and must
    /// perform the native move themselves. `None` for an empty set.
    pub fn resolve(self, len: usize, active: Option<usize>, shift: bool) -> Option<usize> {
        match self {
            Self::Wrap(index) => Some(index),
            Self::Native if len == 0 => None,
            Self::Native => Some(match active {
                Some(i) if shift => i.saturating_sub(1),
                Some(i) => (i + 1).min(len - 1),
                None => 0,
            }),
        }
    }
}

/// Whether `node` takes part in sequential Tab navigation.
fn is_tabbable(doc: &Document, node: NodeId) -> bool {
    doc.is_focusable(node) && doc.attr(node, "tabindex") != Some("-1")
}

/// Tabbable descendants of `root` in document order.
pub fn focusable_elements(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .into_iter()
        .filter(|&node| is_tabbable(doc, node))
        .collect()
}

/// Decide a Tab press given the current focusable count and focused index.
///
/// Wraps Shift+Tab on the first element to the last and Tab on the last to
/// the first. Focus outside the set (on the dialog root itself) is pulled
/// in at the matching end.
pub fn trap_tab(len: usize, active: Option<usize>, shift: bool) -> TrapStep {
    if len == 0 {
        return TrapStep::Native;
    }
    let last = len - 1;
    match active {
        None if shift => TrapStep::Wrap(last),
        None => TrapStep::Wrap(0),
        Some(0) if shift => TrapStep::Wrap(last),
        Some(i) if !shift && i >= last => TrapStep::Wrap(0),
        Some(_) => TrapStep::Native,
    }
}

/// Apply the trap to `root` for a Tab press, moving focus on wrap.
///
/// Returns the newly focused node when the trap intervened.
pub fn trap_focus(doc: &mut Document, root: NodeId, shift: bool) -> Option<NodeId> {
    let focusables = focusable_elements(doc, root);
    let active = doc
        .active_element()
        .and_then(|node| focusables.iter().position(|&f| f == node));

    match trap_tab(focusables.len(), active, shift) {
        TrapStep::Wrap(index) => {
            let target = *focusables.get(index)?;
            doc.focus(target).then_some(target)
        }
        TrapStep::Native => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Markup;

    fn dialog(doc: &mut Document) -> NodeId {
        let body = doc.body();
        doc.build(
            body,
            &Markup::element("div")
                .attr("tabindex", "-1")
                .child(Markup::element("button").attr("id", "close"))
                .child(Markup::element("p").child(Markup::text("Budget")))
                .child(Markup::element("input").attr("id", "name"))
                .child(Markup::element("input").attr("id", "off").attr("disabled", ""))
                .child(Markup::element("a").attr("id", "plain"))
                .child(Markup::element("a").attr("id", "link").attr("href", "#"))
                .child(Markup::element("div").attr("id", "custom").attr("tabindex", "0")),
        )
        .expect("build")
    }

    fn ids(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| doc.attr(n, "id").map(str::to_string))
            .collect()
    }

    #[test]
    fn focusable_query_follows_document_order() {
        let mut doc = Document::new();
        let root = dialog(&mut doc);
        let found = focusable_elements(&doc, root);
        assert_eq!(ids(&doc, &found), ["close", "name", "link", "custom"]);
    }

    #[test]
    fn tab_wraps_only_at_the_edges() {
        assert_eq!(trap_tab(3, Some(2), false), TrapStep::Wrap(0));
        assert_eq!(trap_tab(3, Some(0), true), TrapStep::Wrap(2));
        assert_eq!(trap_tab(3, Some(1), false), TrapStep::Native);
        assert_eq!(trap_tab(3, Some(1), true), TrapStep::Native);
        assert_eq!(trap_tab(3, Some(0), false), TrapStep::Native);
    }

    #[test]
    fn tab_from_outside_the_set_enters_at_the_edge() {
        assert_eq!(trap_tab(3, None, false), TrapStep::Wrap(0));
        assert_eq!(trap_tab(3, None, true), TrapStep::Wrap(2));
        assert_eq!(trap_tab(0, None, false), TrapStep::Native);
    }

    #[test]
    fn single_element_always_wraps_to_itself() {
        assert_eq!(trap_tab(1, Some(0), false), TrapStep::Wrap(0));
        assert_eq!(trap_tab(1, Some(0), true), TrapStep::Wrap(0));
    }

    #[test]
    fn resolve_performs_native_moves() {
        assert_eq!(TrapStep::Native.resolve(3, Some(1), false), Some(2));
        assert_eq!(TrapStep::Native.resolve(3, Some(1), true), Some(0));
        assert_eq!(TrapStep::Wrap(0).resolve(3, Some(2), false), Some(0));
        assert_eq!(TrapStep::Native.resolve(0, None, false), None);
    }

    #[test]
    fn trap_focus_cycles_inside_root() {
        let mut doc = Document::new();
        let root = dialog(&mut doc);
        let custom = doc.get_element_by_id("custom").expect("custom");
        let close = doc.get_element_by_id("close").expect("close");

        assert!(doc.focus(custom));
        assert_eq!(trap_focus(&mut doc, root, false), Some(close));
        assert_eq!(doc.active_element(), Some(close));

        assert_eq!(trap_focus(&mut doc, root, true), Some(custom));
        assert_eq!(doc.active_element(), Some(custom));
    }

    #[test]
    fn trap_sees_elements_added_after_opening() {
        let mut doc = Document::new();
        let root = dialog(&mut doc);
        let custom = doc.get_element_by_id("custom").expect("custom");
        let extra = doc
            .build(root, &Markup::element("button").attr("id", "extra"))
            .expect("build");

        assert!(doc.focus(custom));
        // `custom` is no longer last, so Tab is left to the platform.
        assert_eq!(trap_focus(&mut doc, root, false), None);
        assert!(doc.focus(extra));
        assert!(trap_focus(&mut doc, root, false).is_some());
    }
}
