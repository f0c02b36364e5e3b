use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{choice, date, format_date, text, values_of, FieldKind, FieldSpec, FormSchema};
use crate::error::FormError;
use crate::overlay::FormValues;

super::choice_enum! {
    /// Format of an uploaded project document.
    pub enum DocumentKind {
        Pdf => "PDF",
        Cad => "CAD",
        Doc => "DOC",
    }
    default Pdf
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub date: NaiveDate,
    /// Name of the picked file.
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadSchema;

impl FormSchema for UploadSchema {
    type Record = DocumentUpload;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", "Document Name", FieldKind::Text).required(),
        FieldSpec::new("type", "Document Type", FieldKind::Select(DocumentKind::OPTIONS)),
        FieldSpec::new("date", "Date", FieldKind::Date),
        FieldSpec::new("file", "File", FieldKind::File).required(),
    ];
    const CREATE_TITLE: &'static str = "Upload Document";
    const EDIT_TITLE: &'static str = "Replace Document";
    const CREATE_LABEL: &'static str = "Upload";

    fn defaults(today: NaiveDate) -> FormValues {
        values_of([
            ("name", String::new()),
            ("type", DocumentKind::default().to_string()),
            ("date", format_date(today)),
            ("file", String::new()),
        ])
    }

    fn initial(upload: &DocumentUpload, _today: NaiveDate) -> FormValues {
        values_of([
            ("name", upload.name.clone()),
            ("type", upload.kind.to_string()),
            ("date", format_date(upload.date)),
            ("file", upload.file_name.clone()),
        ])
    }

    fn build(values: &FormValues, today: NaiveDate) -> Result<DocumentUpload, FormError> {
        Ok(DocumentUpload {
            name: text(values, "name"),
            kind: choice(values, "type", "Document Type", DocumentKind::from_label)?,
            date: date(values, "date", "Date")?.unwrap_or(today),
            file_name: text(values, "file"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormState;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).expect("valid date")
    }

    #[test]
    fn file_is_required() {
        let mut form = FormState::<UploadSchema>::new(today());
        form.set("name", "Level 2 MEP layout");
        assert!(form.submit().is_none());
        assert_eq!(form.error(), Some(&FormError::RequiredFields));

        form.set("file", "L2-MEP-rev4.dwg");
        form.set("type", "CAD");
        let upload = form.submit().expect("valid upload");
        assert_eq!(upload.kind, DocumentKind::Cad);
        assert_eq!(upload.date, today());
        assert_eq!(upload.file_name, "L2-MEP-rev4.dwg");
    }

    #[test]
    fn serializes_kind_as_type() {
        let upload = DocumentUpload {
            name: "Site plan".to_string(),
            kind: DocumentKind::Pdf,
            date: today(),
            file_name: "plan.pdf".to_string(),
        };
        let json = serde_json::to_value(&upload).expect("serialize");
        assert_eq!(json["type"], serde_json::json!("PDF"));
        assert_eq!(json["fileName"], serde_json::json!("plan.pdf"));
    }
}
