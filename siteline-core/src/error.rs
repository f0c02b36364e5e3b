//! Error types shared across the overlay engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::dom::NodeId;

/// Failures of structural document operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} does not exist in the document")]
    UnknownNode(NodeId),
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("cannot attach {child:?} under its own descendant {parent:?}")]
    Cycle { parent: NodeId, child: NodeId },
}

/// Misuse of the modal stack capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    #[error("useModal must be used within a ModalProvider")]
    MissingProvider,
}

/// Client-side validation failures of a domain form.
///
/// These are shown inline next to the form; they never escape as panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields")]
    RequiredFields,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("{0} has an unknown value")]
    InvalidChoice(&'static str),
    #[error("{field} must be in format {expected}")]
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },
}

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
