//! Siteline core - headless overlay engine for the Siteline construction
//! dashboard.
//!
//! This crate holds everything about dialogs that does not depend on a UI
//! framework: a small document model, the shared portal mount point, the
//! focus trap, the single-dialog lifecycle, the modal stack with its scoped
//! accessor, and the domain form schemas the dashboard's dialogs are built
//! from. The Dioxus frontend (`siteline-dioxus`) renders the same structure
//! and reuses the pure parts (focus stepping, sizes, form state) directly.
//!
//! ## Quick Start
//!
//! ```
//! use siteline_core::{Document, KeyInput, Markup, Overlay, OverlayProps, PortalRoot};
//!
//! let mut doc = Document::new();
//! let portal = PortalRoot::default();
//! let mut overlay = Overlay::new(OverlayProps::new("Add Project"), || {}, |_| Ok(()))
//!     .with_body(vec![Markup::element("input").attr("id", "name")]);
//!
//! overlay.sync(&mut doc, &portal, true)?;
//! assert!(doc.find_text("Add Project").is_some());
//! overlay.handle_key(&mut doc, KeyInput::escape());
//! overlay.sync(&mut doc, &portal, false)?;
//! # Ok::<(), siteline_core::DomError>(())
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod focus;
pub mod forms;
pub mod overlay;
pub mod portal;
pub mod provider;
pub mod stack;


pub use config::SitelineConfig;
pub use dom::{Document, Markup, NodeId};
pub use error::{ConfigError, DomError, FormError, ModalError};
pub use forms::{FieldKind, FieldSpec, FormMode, FormSchema, FormState};
pub use overlay::{
    ClickOutcome, FormValues, Key, KeyInput, KeyOutcome, Overlay, OverlayPhase, OverlayProps, OverlaySize,
    SubmitOutcome,
};
pub use portal::{PortalMount, PortalRoot, CONTAINER_STYLE, PORTAL_ROOT_ID};
pub use provider::{use_modal, ModalHandle, ModalProvider};
pub use stack::{DialogContent, ModalContent, ModalStack};
