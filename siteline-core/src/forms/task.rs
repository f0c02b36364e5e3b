//! Project tasks. Adding and editing use different field sets over the same
//! record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{choice, date, format_date, percent, text, values_of, FieldKind, FieldSpec, FormSchema};
use crate::error::FormError;
use crate::overlay::FormValues;

super::choice_enum! {
    pub enum TaskPriority {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
    default Medium
}

super::choice_enum! {
    pub enum TaskStatus {
        Active => "Active",
        OnHold => "On Hold",
        Completed => "Completed",
    }
    default Active
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub assignee: String,
    pub deadline: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub progress: u8,
    pub description: String,
}

const TITLE: FieldSpec = FieldSpec::new("title", "Title", FieldKind::Text);
const ASSIGNEE: FieldSpec = FieldSpec::new("assignee", "Assignee", FieldKind::Text);
const DEADLINE: FieldSpec = FieldSpec::new("deadline", "Deadline", FieldKind::Date);
const PRIORITY: FieldSpec = FieldSpec::new("priority", "Priority", FieldKind::Select(TaskPriority::OPTIONS));
const DESCRIPTION: FieldSpec = FieldSpec::new("description", "Description", FieldKind::TextArea { rows: 3 });

fn task_values(task: &Task) -> FormValues {
    values_of([
        ("title", task.title.clone()),
        ("assignee", task.assignee.clone()),
        ("deadline", format_date(task.deadline)),
        ("priority", task.priority.to_string()),
        ("status", task.status.to_string()),
        ("progress", task.progress.to_string()),
        ("description", task.description.clone()),
    ])
}

fn build_task(values: &FormValues, today: NaiveDate) -> Result<Task, FormError> {
    Ok(Task {
        title: text(values, "title"),
        assignee: text(values, "assignee"),
        deadline: date(values, "deadline", "Deadline")?.unwrap_or(today),
        priority: choice(values, "priority", "Priority", TaskPriority::from_label)?,
        status: choice(values, "status", "Status", TaskStatus::from_label)?,
        progress: percent(values, "progress", "Progress")?,
        description: text(values, "description"),
    })
}

/// New task: title and assignee are required, the deadline defaults to today.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddTaskSchema;

impl FormSchema for AddTaskSchema {
    type Record = Task;

    const FIELDS: &'static [FieldSpec] = &[TITLE.required(), ASSIGNEE.required(), DEADLINE, PRIORITY, DESCRIPTION];
    const CREATE_TITLE: &'static str = "Add Task";
    const EDIT_TITLE: &'static str = "Edit Task";
    const CREATE_LABEL: &'static str = "Add Task";

    fn defaults(today: NaiveDate) -> FormValues {
        values_of([
            ("title", String::new()),
            ("assignee", String::new()),
            ("deadline", format_date(today)),
            ("priority", TaskPriority::default().to_string()),
            ("description", String::new()),
        ])
    }

    fn initial(task: &Task, _today: NaiveDate) -> FormValues {
        task_values(task)
    }

    fn build(values: &FormValues, today: NaiveDate) -> Result<Task, FormError> {
        build_task(values, today)
    }
}

/// Existing task: only the title is required; status and progress become
/// editable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditTaskSchema;

impl FormSchema for EditTaskSchema {
    type Record = Task;

    const FIELDS: &'static [FieldSpec] = &[
        TITLE.required(),
        ASSIGNEE,
        FieldSpec::new("status", "Status", FieldKind::Select(TaskStatus::OPTIONS)),
        FieldSpec::new(
            "progress",
            "Progress",
            FieldKind::Range {
                min: 0,
                max: 100,
                step: 1,
            },
        ),
        DEADLINE,
        PRIORITY,
        DESCRIPTION,
    ];
    const CREATE_TITLE: &'static str = "Add Task";
    const EDIT_TITLE: &'static str = "Edit Task";

    fn defaults(today: NaiveDate) -> FormValues {
        values_of([
            ("title", String::new()),
            ("assignee", String::new()),
            ("status", TaskStatus::default().to_string()),
            ("progress", "0".to_string()),
            ("deadline", format_date(today)),
            ("priority", TaskPriority::default().to_string()),
            ("description", String::new()),
        ])
    }

    fn initial(task: &Task, _today: NaiveDate) -> FormValues {
        task_values(task)
    }

    fn build(values: &FormValues, today: NaiveDate) -> Result<Task, FormError> {
        build_task(values, today)
    }
}
