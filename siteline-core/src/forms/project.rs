//! Project creation and editing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{choice, date, format_date, number, percent, text, values_of, FieldKind, FieldSpec, FormSchema};
use crate::error::FormError;
use crate::overlay::{FormValues, OverlaySize};

super::choice_enum! {
    /// Delivery status of a project.
    pub enum ProjectStatus {
        NotStarted => "Not Started",
        OnTrack => "On Track",
        Delayed => "Delayed",
        Completed => "Completed",
    }
    default NotStarted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    pub status: ProjectStatus,
    pub progress: u8,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectSchema;

impl FormSchema for ProjectSchema {
    type Record = Project;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Project Name", FieldKind::Text).required(),
        FieldSpec::new("location", "Location", FieldKind::Text).required(),
        FieldSpec::new("start_date", "Start Date", FieldKind::Date),
        FieldSpec::new("end_date", "End Date", FieldKind::Date),
        FieldSpec::new(
            "budget",
            "Budget",
            FieldKind::Number {
                min: 0.0,
                max: None,
                step: 1000.0,
            },
        ),
        FieldSpec::new("status", "Status", FieldKind::Select(ProjectStatus::OPTIONS)),
        FieldSpec::new(
            "progress",
            "Progress",
            FieldKind::Range {
                min: 0,
                max: 100,
                step: 5,
            },
        ),
        FieldSpec::new("description", "Description", FieldKind::TextArea { rows: 3 }),
    ];
    const SIZE: OverlaySize = OverlaySize::Large;
    const CREATE_TITLE: &'static str = "Add Project";
    const EDIT_TITLE: &'static str = "Edit Project";

    fn defaults(today: NaiveDate) -> FormValues {
        values_of([
            ("name", String::new()),
            ("location", String::new()),
            ("start_date", format_date(today)),
            ("end_date", String::new()),
            ("budget", String::new()),
            ("status", ProjectStatus::default().to_string()),
            ("progress", "0".to_string()),
            ("description", String::new()),
        ])
    }

    fn initial(project: &Project, _today: NaiveDate) -> FormValues {
        let budget = if project.budget.abs() < f64::EPSILON {
            String::new()
        } else {
            project.budget.to_string()
        };
        values_of([
            ("name", project.name.clone()),
            ("location", project.location.clone()),
            ("start_date", format_date(project.start_date)),
            ("end_date", project.end_date.map(format_date).unwrap_or_default()),
            ("budget", budget),
            ("status", project.status.to_string()),
            ("progress", project.progress.to_string()),
            ("description", project.description.clone()),
        ])
    }

    fn build(values: &FormValues, today: NaiveDate) -> Result<Project, FormError> {
        Ok(Project {
            name: text(values, "name"),
            location: text(values, "location"),
            start_date: date(values, "start_date", "Start Date")?.unwrap_or(today),
            end_date: date(values, "end_date", "End Date")?,
            budget: number(values, "budget", "Budget")?,
            status: choice(values, "status", "Status", ProjectStatus::from_label)?,
            progress: percent(values, "progress", "Progress")?,
            description: text(values, "description"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{FormMode, FormState};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).expect("valid date")
    }

    #[test]
    fn new_form_has_defaults() {
        let form = FormState::<ProjectSchema>::new(today());
        assert_eq!(form.title(), "Add Project");
        assert_eq!(form.submit_label(), "Create");
        assert_eq!(form.get("name"), "");
        assert_eq!(form.get("status"), "Not Started");
        assert_eq!(form.get("progress"), "0");
        assert_eq!(form.get("start_date"), "2024-03-18");
        assert_eq!(form.size(), OverlaySize::Large);
    }

    #[test]
    fn missing_required_fields_block_submit() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "Riverside Tower");
        assert_eq!(form.submit(), None);
        assert_eq!(form.error(), Some(&FormError::RequiredFields));
        assert_eq!(form.error().map(ToString::to_string).as_deref(), Some("Please fill in all required fields"));
        // The entered value survives the failed attempt.
        assert_eq!(form.get("name"), "Riverside Tower");
    }

    #[test]
    fn whitespace_does_not_satisfy_required() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "   ");
        form.set("location", "Dubai");
        assert_eq!(form.submit(), None);
    }

    #[test]
    fn valid_submit_coerces_numbers_and_resets() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "New Project");
        form.set("location", "New Location");
        form.set("budget", "1000");
        form.set("progress", "75");

        let project = form.submit().expect("valid project");
        assert!((project.budget - 1000.0).abs() < f64::EPSILON);
        assert_eq!(project.progress, 75);
        assert_eq!(project.status, ProjectStatus::NotStarted);
        assert_eq!(project.start_date, today());
        assert_eq!(project.end_date, None);

        assert_eq!(form.get("name"), "");
        assert!(form.error().is_none());
    }

    #[test]
    fn blank_budget_becomes_zero() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "Depot");
        form.set("location", "Sharjah");
        let project = form.submit().expect("valid project");
        assert!(project.budget.abs() < f64::EPSILON);
        assert_eq!(project.progress, 0);
    }

    #[test]
    fn editing_populates_from_record() {
        let record = Project {
            name: "Test Project".to_string(),
            location: "Test Location".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31),
            budget: 100_000.0,
            status: ProjectStatus::OnTrack,
            progress: 50,
            description: "Test Description".to_string(),
        };
        let mut form = FormState::<ProjectSchema>::editing(&record, today());
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.title(), "Edit Project");
        assert_eq!(form.submit_label(), "Save");
        assert_eq!(form.get("status"), "On Track");
        assert_eq!(form.get("progress"), "50");
        assert_eq!(form.get("end_date"), "2023-12-31");

        assert_eq!(form.submit(), Some(record));
    }

    #[test]
    fn cancel_discards_edits() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "Test Project");
        form.cancel();
        assert_eq!(form.get("name"), "");
    }

    #[test]
    fn editing_clears_error() {
        let mut form = FormState::<ProjectSchema>::new(today());
        assert!(form.submit().is_none());
        assert!(form.error().is_some());
        form.set("location", "Abu Dhabi");
        assert!(form.error().is_none());
    }

    #[test]
    fn record_serializes_with_numeric_fields() {
        let mut form = FormState::<ProjectSchema>::new(today());
        form.set("name", "Depot");
        form.set("location", "Sharjah");
        form.set("budget", "2500.5");
        let project = form.submit().expect("valid project");

        let json = serde_json::to_value(&project).expect("serialize");
        assert_eq!(json["budget"], serde_json::json!(2500.5));
        assert_eq!(json["progress"], serde_json::json!(0));
        assert_eq!(json["status"], serde_json::json!("Not Started"));
        assert_eq!(json["startDate"], serde_json::json!("2024-03-18"));
    }
}
