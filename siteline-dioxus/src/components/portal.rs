//! Portal component.
//!
//! Renders its children into a dedicated container, then has the overlay
//! script move that container under the shared mount point
//! (`#portal-root` by default) so no ancestor can clip it or cap its
//! stacking order. The mount point is created by the first portal and
//! removed after the last one unmounts.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dioxus::prelude::*;
use parking_lot::Mutex;
use siteline_core::CONTAINER_STYLE;

use crate::hooks::use_overlay_settings;
use crate::script;

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(0);

static MOUNTED: Mutex<PortalRegistry> = parking_lot::const_mutex(PortalRegistry::new());

/// Live portal containers per mount point id.
#[derive(Debug, Default)]
struct PortalRegistry {
    counts: BTreeMap<String, usize>,
}

impl PortalRegistry {
    const fn new() -> Self {
        Self { counts: BTreeMap::new() }
    }

    /// Register a container under `root_id`. True for the first one.
    fn acquire(&mut self, root_id: &str) -> bool {
        let count = self.counts.entry(root_id.to_string()).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Unregister a container. True when it was the last one.
    fn release(&mut self, root_id: &str) -> bool {
        match self.counts.get_mut(root_id) {
            Some(count) if *count > 1 => {
                *count -= 1;
                false
            }
            Some(_) => {
                self.counts.remove(root_id);
                true
            }
            None => {
                log::debug!("Portal release for '#{root_id}' without a matching acquire");
                false
            }
        }
    }
}

#[component]
pub fn Portal(children: Element) -> Element {
    let settings = use_overlay_settings();
    let root_id = settings.portal_root_id;

    let container_id = use_hook(|| {
        let id = NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed);
        format!("portal-container-{id}")
    });

    use_hook({
        let root_id = root_id.clone();
        move || {
            MOUNTED.lock().acquire(&root_id);
        }
    });

    use_effect({
        let container_id = container_id.clone();
        let root_id = root_id.clone();
        move || {
            let container_id = container_id.clone();
            let root_id = root_id.clone();
            spawn(async move {
                match script::attach(&container_id, &root_id).await {
                    Ok(true) => log::warn!("Portal root element '{root_id}' was missing and has been created"),
                    Ok(false) => {}
                    Err(err) => log::error!("Failed to attach portal container '{container_id}': {err}"),
                }
            });
        }
    });

    use_drop({
        let root_id = root_id.clone();
        move || {
            if MOUNTED.lock().release(&root_id) {
                script::release(&root_id);
            }
        }
    });

    rsx! {
        div {
            id: "{container_id}",
            class: "portal-container",
            style: CONTAINER_STYLE,
            {children}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tracks_first_and_last_container() {
        let mut registry = PortalRegistry::new();
        assert!(registry.acquire("portal-root"));
        assert!(!registry.acquire("portal-root"));
        assert!(registry.acquire("overlay-root"));

        assert!(!registry.release("portal-root"));
        assert!(registry.release("portal-root"));
        assert!(registry.release("overlay-root"));
    }

    #[test]
    fn unmatched_release_is_ignored() {
        let mut registry = PortalRegistry::new();
        assert!(!registry.release("portal-root"));
        assert!(registry.acquire("portal-root"));
    }
}
