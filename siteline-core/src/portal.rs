//! Shared mount point for overlay content.
//!
//! Overlays are rendered into a container appended to a single page-wide
//! mount point instead of their logical parent, so ancestors cannot clip them
//! or cap their stacking order.
//!
//! # Invariants
//!
//! - At most one mount point with the configured id exists at a time.
//! - The mount point lives exactly as long as it has attached containers:
//!   [`PortalRoot::mount`] creates it when absent, [`PortalMount::unmount`]
//!   removes it once its last container is gone.
//!
//! # Failure Modes
//!
//! - Teardown racing with other removals (container or mount point already
//!   detached) is logged at debug level and otherwise ignored.

use crate::dom::{Document, NodeId};

/// Default id of the shared mount point.
pub const PORTAL_ROOT_ID: &str = "portal-root";

/// Inline style of every per-caller container.
pub const CONTAINER_STYLE: &str = "position: relative; z-index: 9999";

/// Locates or creates the shared mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRoot {
    id: String,
}

impl Default for PortalRoot {
    fn default() -> Self {
        Self::new(PORTAL_ROOT_ID)
    }
}

impl PortalRoot {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the shared mount point currently exists.
    pub fn is_mounted(&self, doc: &Document) -> bool {
        doc.get_element_by_id(&self.id).is_some()
    }

    /// Acquire a dedicated container under the shared mount point.
    pub fn mount(&self, doc: &mut Document) -> PortalMount {
        let root = match doc.get_element_by_id(&self.id) {
            Some(root) => root,
            None => {
                let root = doc.create_element("div");
                doc.set_attr(root, "id", &self.id);
                let body = doc.body();
                // Both nodes are live and the root is fresh, so no cycle is possible.
                let _ = doc.append_child(body, root);
                log::warn!("Portal root element '{}' was missing and has been created", self.id);
                root
            }
        };

        let container = doc.create_element("div");
        doc.set_attr(container, "style", CONTAINER_STYLE);
        let _ = doc.append_child(root, container);

        PortalMount { root, container }
    }
}

/// One caller's container under the shared mount point.
///
/// Not `Clone`: releasing it consumes the handle.
#[derive(Debug, PartialEq, Eq)]
pub struct PortalMount {
    root: NodeId,
    container: NodeId,
}

impl PortalMount {
    /// Node to render portaled content into.
    #[inline]
    pub fn container(&self) -> NodeId {
        self.container
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Release the container, removing the mount point if it is now empty.
    pub fn unmount(self, doc: &mut Document) {
        if let Err(err) = doc.remove_child(self.root, self.container) {
            log::debug!("Portal container already detached: {err}");
        }
        doc.discard(self.container);

        if doc.children(self.root).is_empty() {
            let body = doc.body();
            match doc.remove_child(body, self.root) {
                Ok(()) => doc.discard(self.root),
                Err(err) => log::debug!("Portal root already detached: {err}"),
            }
        }
    }
}
