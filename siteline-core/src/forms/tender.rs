//! Tender registration.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{choice, date, format_date, text, values_of, FieldKind, FieldSpec, FormSchema, RequiredStyle};
use crate::error::FormError;
use crate::overlay::FormValues;

/// Tender values are quoted in millions of dollars, e.g. `$5.2M`.
static TENDER_VALUE: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"^\$\d+(\.\d+)?M$"));

fn is_tender_value(value: &str) -> bool {
    match &*TENDER_VALUE {
        Ok(pattern) => pattern.is_match(value),
        Err(err) => {
            log::error!("Tender value pattern failed to compile: {err}");
            false
        }
    }
}

super::choice_enum! {
    pub enum TenderStatus {
        Draft => "Draft",
        InProgress => "In Progress",
        PendingReview => "Pending Review",
        Completed => "Completed",
    }
    default Draft
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub project_name: String,
    pub reference: String,
    pub client: String,
    pub submission_date: NaiveDate,
    pub value: String,
    pub status: TenderStatus,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TenderSchema;

impl FormSchema for TenderSchema {
    type Record = Tender;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("project_name", "Project Name", FieldKind::Text).required(),
        FieldSpec::new("reference", "Reference", FieldKind::Text).required(),
        FieldSpec::new("client", "Client", FieldKind::Text).required(),
        FieldSpec::new("submission_date", "Submission Date", FieldKind::Date).required(),
        FieldSpec::new("value", "Value", FieldKind::Text).required(),
        FieldSpec::new("status", "Status", FieldKind::Select(TenderStatus::OPTIONS)),
        FieldSpec::new("description", "Description", FieldKind::TextArea { rows: 3 }),
    ];
    const REQUIRED_STYLE: RequiredStyle = RequiredStyle::PerField;
    const CREATE_TITLE: &'static str = "New Tender";
    const EDIT_TITLE: &'static str = "Edit Tender";
    const EDIT_LABEL: &'static str = "Update";

    fn defaults(_today: NaiveDate) -> FormValues {
        values_of([
            ("project_name", String::new()),
            ("reference", String::new()),
            ("client", String::new()),
            ("submission_date", String::new()),
            ("value", String::new()),
            ("status", TenderStatus::default().to_string()),
            ("description", String::new()),
        ])
    }

    fn initial(tender: &Tender, _today: NaiveDate) -> FormValues {
        values_of([
            ("project_name", tender.project_name.clone()),
            ("reference", tender.reference.clone()),
            ("client", tender.client.clone()),
            ("submission_date", format_date(tender.submission_date)),
            ("value", tender.value.clone()),
            ("status", tender.status.to_string()),
            ("description", tender.description.clone()),
        ])
    }

    fn build(values: &FormValues, today: NaiveDate) -> Result<Tender, FormError> {
        let value = text(values, "value");
        if !is_tender_value(&value) {
            return Err(FormError::InvalidFormat {
                field: "Value",
                expected: "$X.XM (e.g., $5.2M)",
            });
        }
        Ok(Tender {
            project_name: text(values, "project_name"),
            reference: text(values, "reference"),
            client: text(values, "client"),
            submission_date: date(values, "submission_date", "Submission Date")?.unwrap_or(today),
            value,
            status: choice(values, "status", "Status", TenderStatus::from_label)?,
            description: text(values, "description"),
        })
    }
}
