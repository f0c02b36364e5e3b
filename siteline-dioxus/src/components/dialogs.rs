//! Domain dialogs of the dashboard.
//!
//! Each dialog owns its form state for as long as it is mounted, so a
//! cancelled edit is discarded and a reopened dialog starts from the record
//! it was given. Mount with a `key` derived from the record when the same
//! slot edits different records.

use dioxus::prelude::*;
use siteline_core::forms::{
    AddTaskSchema, DocumentUpload, EditTaskSchema, Project, ProjectSchema, Subcontractor, SubcontractorSchema, Task,
    Tender, TenderSchema, UploadSchema,
};

use super::form_dialog;
use crate::hooks::use_form;

/// Add or edit a project.
#[component]
pub fn ProjectModal(
    is_open: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<Project>,
    project: Option<Project>,
) -> Element {
    let form = use_form::<ProjectSchema>(project.as_ref());
    form_dialog(form, is_open, on_close, on_submit)
}

/// Create or edit a tender. The value must read like `$5.2M`.
#[component]
pub fn TenderModal(
    is_open: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<Tender>,
    tender: Option<Tender>,
) -> Element {
    let form = use_form::<TenderSchema>(tender.as_ref());
    form_dialog(form, is_open, on_close, on_submit)
}

#[component]
pub fn SubcontractorModal(
    is_open: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<Subcontractor>,
    subcontractor: Option<Subcontractor>,
) -> Element {
    let form = use_form::<SubcontractorSchema>(subcontractor.as_ref());
    form_dialog(form, is_open, on_close, on_submit)
}

#[component]
pub fn AddTaskModal(is_open: bool, on_close: EventHandler<()>, on_submit: EventHandler<Task>) -> Element {
    let form = use_form::<AddTaskSchema>(None);
    form_dialog(form, is_open, on_close, on_submit)
}

#[component]
pub fn EditTaskModal(is_open: bool, on_close: EventHandler<()>, on_submit: EventHandler<Task>, task: Task) -> Element {
    let form = use_form::<EditTaskSchema>(Some(&task));
    form_dialog(form, is_open, on_close, on_submit)
}

#[component]
pub fn UploadDocumentModal(
    is_open: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<DocumentUpload>,
) -> Element {
    let form = use_form::<UploadSchema>(None);
    form_dialog(form, is_open, on_close, on_submit)
}
