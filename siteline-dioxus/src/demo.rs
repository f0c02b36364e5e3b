//! Projects page with sample data, wired to every dashboard dialog.

use chrono::NaiveDate;
use dioxus::prelude::*;
use siteline_core::forms::{
    DocumentUpload, Project, ProjectStatus, Subcontractor, SubcontractorStatus, Task, TaskPriority, TaskStatus, Tender,
};

use crate::components::{
    use_modal, AddTaskModal, BaseModal, EditTaskModal, ProjectModal, SubcontractorModal, TenderModal,
    UploadDocumentModal,
};

/// A sample date, or `None` (logged) when the calendar rejects it.
fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        log::warn!("Skipping sample record with invalid date {year}-{month:02}-{day:02}");
    }
    date
}

fn sample_projects() -> Vec<Project> {
    let riverside = || {
        Some(Project {
            name: "Riverside Offices".to_string(),
            location: "Leeds".to_string(),
            start_date: ymd(2026, 2, 2)?,
            end_date: Some(ymd(2027, 6, 30)?),
            budget: 4_200_000.0,
            status: ProjectStatus::OnTrack,
            progress: 35,
            description: "Four storey office block with basement parking.".to_string(),
        })
    };
    let harbour = || {
        Some(Project {
            name: "Harbour Bridge Refurbishment".to_string(),
            location: "Bristol".to_string(),
            start_date: ymd(2025, 9, 15)?,
            end_date: None,
            budget: 1_750_000.0,
            status: ProjectStatus::Delayed,
            progress: 60,
            description: String::new(),
        })
    };
    [riverside(), harbour()].into_iter().flatten().collect()
}

fn sample_tasks() -> Vec<Task> {
    ymd(2026, 11, 4)
        .map(|deadline| Task {
            title: "Pour level 2 slab".to_string(),
            assignee: "Site team A".to_string(),
            deadline,
            priority: TaskPriority::High,
            status: TaskStatus::Active,
            progress: 20,
            description: String::new(),
        })
        .into_iter()
        .collect()
}

fn sample_subcontractors() -> Vec<Subcontractor> {
    vec![Subcontractor {
        name: "Northline Electrical".to_string(),
        specialty: "Electrical".to_string(),
        status: SubcontractorStatus::Active,
        rating: 4.5,
        email: "office@northline.example".to_string(),
        phone: "0113 496 0000".to_string(),
        address: String::new(),
        description: String::new(),
    }]
}

#[component]
pub fn ProjectsPage() -> Element {
    let mut projects = use_signal(sample_projects);
    let mut tasks = use_signal(sample_tasks);
    let mut subcontractors = use_signal(sample_subcontractors);
    let mut tenders = use_signal(Vec::<Tender>::new);
    let mut documents = use_signal(Vec::<DocumentUpload>::new);

    let mut adding_project = use_signal(|| false);
    let mut editing_project = use_signal(|| None::<usize>);
    let mut adding_task = use_signal(|| false);
    let mut editing_task = use_signal(|| None::<usize>);
    let mut editing_subcontractor = use_signal(|| None::<usize>);

    let modal = use_modal();

    let project_in_edit = editing_project().and_then(|index| projects.read().get(index).cloned().map(|p| (index, p)));
    let task_in_edit = editing_task().and_then(|index| tasks.read().get(index).cloned().map(|t| (index, t)));
    let subcontractor_in_edit =
        editing_subcontractor().and_then(|index| subcontractors.read().get(index).cloned().map(|s| (index, s)));

    let open_tender = move |_: MouseEvent| {
        let mut stack = modal;
        let content = rsx! {
            TenderModal {
                is_open: true,
                on_close: move |()| stack.close_modal(),
                on_submit: move |tender: Tender| {
                    log::info!("Tender '{}' saved", tender.reference);
                    tenders.write().push(tender);
                },
            }
        };
        stack.open_modal(content);
    };

    let open_upload = move |_: MouseEvent| {
        let mut stack = modal;
        let content = rsx! {
            UploadDocumentModal {
                is_open: true,
                on_close: move |()| stack.close_modal(),
                on_submit: move |upload: DocumentUpload| documents.write().push(upload),
            }
        };
        stack.open_modal(content);
    };

    let open_new_subcontractor = move |_: MouseEvent| {
        let mut stack = modal;
        let content = rsx! {
            SubcontractorModal {
                is_open: true,
                on_close: move |()| stack.close_modal(),
                on_submit: move |subcontractor: Subcontractor| subcontractors.write().push(subcontractor),
            }
        };
        stack.open_modal(content);
    };

    let confirm_delete = move |index: usize| {
        let mut stack = modal;
        let name = projects.read().get(index).map(|p| p.name.clone()).unwrap_or_default();
        let content = rsx! {
            BaseModal {
                is_open: true,
                title: "Delete Project",
                submit_text: "Delete",
                size: siteline_core::OverlaySize::Small,
                on_close: move |()| stack.close_modal(),
                on_submit: move |_: FormEvent| -> anyhow::Result<()> {
                    if index >= projects.read().len() {
                        anyhow::bail!("project {index} no longer exists");
                    }
                    let removed = projects.write().remove(index);
                    log::info!("Deleted project '{}'", removed.name);
                    stack.close_all_modals();
                    Ok(())
                },
                p { "Delete \"{name}\"? This cannot be undone." }
            }
        };
        stack.open_modal(content);
    };

    rsx! {
        section {
            class: "page-section",
            div {
                class: "section-header",
                h2 { "Projects" }
                div {
                    class: "section-actions",
                    button { class: "btn btn-primary", onclick: move |_| adding_project.set(true), "Add project" }
                    button { class: "btn btn-secondary", onclick: open_tender, "New tender" }
                    button { class: "btn btn-secondary", onclick: open_upload, "Upload document" }
                }
            }
            table {
                class: "data-table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Location" }
                        th { "Status" }
                        th { "Progress" }
                        th {}
                    }
                }
                tbody {
                    for (index, project) in projects.read().iter().enumerate() {
                        tr {
                            key: "{index}",
                            td { "{project.name}" }
                            td { "{project.location}" }
                            td { "{project.status}" }
                            td { "{project.progress}%" }
                            td {
                                button { class: "btn btn-link", onclick: move |_| editing_project.set(Some(index)), "Edit" }
                                button { class: "btn btn-link", onclick: move |_| confirm_delete(index), "Delete" }
                            }
                        }
                    }
                }
            }
        }

        section {
            class: "page-section",
            div {
                class: "section-header",
                h2 { "Tasks" }
                button { class: "btn btn-primary", onclick: move |_| adding_task.set(true), "Add task" }
            }
            ul {
                class: "item-list",
                for (index, task) in tasks.read().iter().enumerate() {
                    li {
                        key: "{index}",
                        span { "{task.title} ({task.assignee}) - {task.priority}, {task.status}, {task.progress}%" }
                        button { class: "btn btn-link", onclick: move |_| editing_task.set(Some(index)), "Edit" }
                    }
                }
            }
        }

        section {
            class: "page-section",
            div {
                class: "section-header",
                h2 { "Subcontractors" }
                button { class: "btn btn-primary", onclick: open_new_subcontractor, "Add subcontractor" }
            }
            ul {
                class: "item-list",
                for (index, subcontractor) in subcontractors.read().iter().enumerate() {
                    li {
                        key: "{index}",
                        span { "{subcontractor.name} - {subcontractor.specialty} (rating {subcontractor.rating})" }
                        button { class: "btn btn-link", onclick: move |_| editing_subcontractor.set(Some(index)), "Edit" }
                    }
                }
            }
        }

        section {
            class: "page-section",
            h2 { "Tenders and documents" }
            ul {
                class: "item-list",
                for tender in tenders.read().iter() {
                    li { key: "{tender.reference}", "{tender.reference}: {tender.project_name} ({tender.value}, {tender.status})" }
                }
                for document in documents.read().iter() {
                    li { key: "{document.file_name}", "{document.name} [{document.kind}] {document.file_name}" }
                }
            }
        }

        ProjectModal {
            is_open: adding_project(),
            on_close: move |()| adding_project.set(false),
            on_submit: move |project: Project| projects.write().push(project),
        }

        if let Some((index, project)) = project_in_edit {
            ProjectModal {
                key: "project-{index}",
                is_open: true,
                project,
                on_close: move |()| editing_project.set(None),
                on_submit: move |project: Project| {
                    if let Some(slot) = projects.write().get_mut(index) {
                        *slot = project;
                    }
                },
            }
        }

        AddTaskModal {
            is_open: adding_task(),
            on_close: move |()| adding_task.set(false),
            on_submit: move |task: Task| tasks.write().push(task),
        }

        if let Some((index, task)) = task_in_edit {
            EditTaskModal {
                key: "task-{index}",
                is_open: true,
                task,
                on_close: move |()| editing_task.set(None),
                on_submit: move |task: Task| {
                    if let Some(slot) = tasks.write().get_mut(index) {
                        *slot = task;
                    }
                },
            }
        }

        if let Some((index, subcontractor)) = subcontractor_in_edit {
            SubcontractorModal {
                key: "subcontractor-{index}",
                is_open: true,
                subcontractor,
                on_close: move |()| editing_subcontractor.set(None),
                on_submit: move |subcontractor: Subcontractor| {
                    if let Some(slot) = subcontractors.write().get_mut(index) {
                        *slot = subcontractor;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;

    #[test]
    fn invalid_sample_date_is_rejected() {
        assert_eq!(ymd(2026, 2, 30), None);
        assert_eq!(ymd(2026, 2, 28), NaiveDate::from_ymd_opt(2026, 2, 28));
    }

    #[test]
    fn sample_data_is_complete() {
        let projects = sample_projects();
        assert_eq!(projects.len(), 2);
        assert!(projects.iter().all(|p| p.start_date.year() >= 2025));
        assert_eq!(sample_tasks().len(), 1);
        assert_eq!(sample_subcontractors().len(), 1);
    }
}
