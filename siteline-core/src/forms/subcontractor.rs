use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{choice, number, text, values_of, FieldKind, FieldSpec, FormSchema};
use crate::error::FormError;
use crate::overlay::{FormValues, OverlaySize};

/// Highest rating a subcontractor can be given.
pub const MAX_RATING: f64 = 5.0;

super::choice_enum! {
    pub enum SubcontractorStatus {
        Active => "Active",
        OnHold => "On Hold",
        Inactive => "Inactive",
    }
    default Active
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcontractor {
    pub name: String,
    pub specialty: String,
    pub status: SubcontractorStatus,
    /// `0.0..=5.0`, one decimal.
    pub rating: f64,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubcontractorSchema;

impl FormSchema for SubcontractorSchema {
    type Record = Subcontractor;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Company Name", FieldKind::Text).required(),
        FieldSpec::new("specialty", "Specialty", FieldKind::Text).required(),
        FieldSpec::new("email", "Email", FieldKind::Email),
        FieldSpec::new("phone", "Phone", FieldKind::Tel),
        FieldSpec::new("address", "Address", FieldKind::Text),
        FieldSpec::new("status", "Status", FieldKind::Select(SubcontractorStatus::OPTIONS)),
        FieldSpec::new(
            "rating",
            "Rating",
            FieldKind::Number {
                min: 0.0,
                max: Some(MAX_RATING),
                step: 0.1,
            },
        ),
        FieldSpec::new("description", "Description", FieldKind::TextArea { rows: 3 }),
    ];
    const SIZE: OverlaySize = OverlaySize::Large;
    const CREATE_TITLE: &'static str = "Add Subcontractor";
    const EDIT_TITLE: &'static str = "Edit Subcontractor";

    fn defaults(_today: NaiveDate) -> FormValues {
        values_of([
            ("name", String::new()),
            ("specialty", String::new()),
            ("email", String::new()),
            ("phone", String::new()),
            ("address", String::new()),
            ("status", SubcontractorStatus::default().to_string()),
            ("rating", "0".to_string()),
            ("description", String::new()),
        ])
    }

    fn initial(sub: &Subcontractor, _today: NaiveDate) -> FormValues {
        values_of([
            ("name", sub.name.clone()),
            ("specialty", sub.specialty.clone()),
            ("email", sub.email.clone()),
            ("phone", sub.phone.clone()),
            ("address", sub.address.clone()),
            ("status", sub.status.to_string()),
            ("rating", format!("{:.1}", sub.rating)),
            ("description", sub.description.clone()),
        ])
    }

    fn build(values: &FormValues, _today: NaiveDate) -> Result<Subcontractor, FormError> {
        let rating = number(values, "rating", "Rating")?.clamp(0.0, MAX_RATING);
        Ok(Subcontractor {
            name: text(values, "name"),
            specialty: text(values, "specialty"),
            status: choice(values, "status", "Status", SubcontractorStatus::from_label)?,
            rating: (rating * 10.0).round() / 10.0,
            email: text(values, "email"),
            phone: text(values, "phone"),
            address: text(values, "address"),
            description: text(values, "description"),
        })
    }
}
