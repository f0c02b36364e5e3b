//! UI components for siteline-dioxus.
//!
//! The overlay building blocks (portal, base modal, modal stack) and the
//! dashboard dialogs built on them.

mod base_modal;
mod dialogs;
mod error_boundary;
mod modal_provider;
mod portal;
mod schema_fields;

pub use base_modal::BaseModal;
pub use dialogs::{AddTaskModal, EditTaskModal, ProjectModal, SubcontractorModal, TenderModal, UploadDocumentModal};
pub use error_boundary::PageErrorBoundary;
pub use modal_provider::{try_use_modal, use_modal, ModalHandle, ModalProvider};
pub use portal::Portal;
pub use schema_fields::{form_dialog, SchemaFields};
