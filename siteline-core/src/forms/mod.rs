//! Domain forms consumed by the dialogs.
//!
//! Every create/edit modal in the dashboard has the same shape: a flat set
//! of string-valued fields, a few of them required, numeric fields coerced
//! on submit. A [`FormSchema`] describes one such form; [`FormState`] holds
//! the values being edited, the inline error and the create/edit mode.
//!
//! Validation failures are state, not errors thrown at the caller: a failed
//! [`FormState::submit`] returns `None` and leaves a message to display.

use std::marker::PhantomData;

use chrono::NaiveDate;

use crate::dom::Markup;
use crate::error::FormError;
use crate::overlay::{FormValues, OverlaySize};

pub use project::{Project, ProjectSchema, ProjectStatus};
pub use subcontractor::{Subcontractor, SubcontractorSchema, SubcontractorStatus};
pub use task::{AddTaskSchema, EditTaskSchema, Task, TaskPriority, TaskStatus};
pub use tender::{Tender, TenderSchema, TenderStatus};
pub use upload::{DocumentKind, DocumentUpload, UploadSchema};

/// Date format of `date` inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed set of labelled options backing a `select` field.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const OPTIONS: &'static [&'static str] = &[$($label),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}
pub(crate) use choice_enum;

mod project;
mod subcontractor;
mod task;
mod tender;
mod upload;

/// Input widget of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Date,
    Number { min: f64, max: Option<f64>, step: f64 },
    Range { min: u32, max: u32, step: u32 },
    Select(&'static [&'static str]),
    TextArea { rows: u32 },
    File,
}

impl FieldKind {
    /// `type` attribute for `input`-based kinds.
    pub const fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Email => Some("email"),
            Self::Tel => Some("tel"),
            Self::Date => Some("date"),
            Self::Number { .. } => Some("number"),
            Self::Range { .. } => Some("range"),
            Self::File => Some("file"),
            Self::Select(_) | Self::TextArea { .. } => None,
        }
    }
}

/// One field of a form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            kind,
            required: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// How missing required fields are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredStyle {
    /// One message for any number of missing fields.
    Generic,
    /// Name the first missing field.
    PerField,
}

/// Static description of a domain form.
pub trait FormSchema {
    type Record;

    const FIELDS: &'static [FieldSpec];
    const SIZE: OverlaySize = OverlaySize::Medium;
    const REQUIRED_STYLE: RequiredStyle = RequiredStyle::Generic;
    const CREATE_TITLE: &'static str;
    const EDIT_TITLE: &'static str;
    const CREATE_LABEL: &'static str = "Create";
    const EDIT_LABEL: &'static str = "Save";

    /// Values of a blank form.
    fn defaults(today: NaiveDate) -> FormValues;

    /// Values of a form editing `record`.
    fn initial(record: &Self::Record, today: NaiveDate) -> FormValues;

    /// Coerce validated values into a record. Required fields are already
    /// known to be non-blank.
    fn build(values: &FormValues, today: NaiveDate) -> Result<Self::Record, FormError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Editable state of one form.
#[derive(Debug, Clone)]
pub struct FormState<S: FormSchema> {
    values: FormValues,
    pristine: FormValues,
    error: Option<FormError>,
    mode: FormMode,
    today: NaiveDate,
    schema: PhantomData<S>,
}

impl<S: FormSchema> FormState<S> {
    /// A blank create form.
    pub fn new(today: NaiveDate) -> Self {
        Self::with_values(S::defaults(today), FormMode::Create, today)
    }

    /// An edit form populated from `record`.
    pub fn editing(record: &S::Record, today: NaiveDate) -> Self {
        Self::with_values(S::initial(record, today), FormMode::Edit, today)
    }

    fn with_values(values: FormValues, mode: FormMode, today: NaiveDate) -> Self {
        Self {
            pristine: values.clone(),
            values,
            error: None,
            mode,
            today,
            schema: PhantomData,
        }
    }

    #[inline]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        S::FIELDS
    }

    pub fn size(&self) -> OverlaySize {
        S::SIZE
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => S::CREATE_TITLE,
            FormMode::Edit => S::EDIT_TITLE,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => S::CREATE_LABEL,
            FormMode::Edit => S::EDIT_LABEL,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// Update one field. Editing clears the inline error.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        if !S::FIELDS.iter().any(|f| f.id == field) {
            log::warn!("Ignoring unknown form field '{field}'");
            return;
        }
        self.values.insert(field.to_string(), value.into());
        self.error = None;
    }

    /// Copy every known field from `values`, e.g. collected from a rendered form.
    pub fn load(&mut self, values: &FormValues) {
        for field in S::FIELDS {
            if let Some(value) = values.get(field.id) {
                self.values.insert(field.id.to_string(), value.clone());
            }
        }
    }

    /// Validate and coerce. On success the form is reset and the record
    /// returned; on failure the inline error is set and nothing is returned.
    pub fn submit(&mut self) -> Option<S::Record> {
        self.error = None;
        match self.validate() {
            Ok(record) => {
                self.reset();
                Some(record)
            }
            Err(err) => {
                log::debug!("Form '{}' rejected: {err}", self.title());
                self.error = Some(err);
                None
            }
        }
    }

    fn validate(&self) -> Result<S::Record, FormError> {
        let missing = S::FIELDS
            .iter()
            .find(|field| field.required && self.get(field.id).trim().is_empty());
        if let Some(field) = missing {
            return Err(match S::REQUIRED_STYLE {
                RequiredStyle::Generic => FormError::RequiredFields,
                RequiredStyle::PerField => FormError::MissingField(field.label),
            });
        }
        S::build(&self.values, self.today)
    }

    /// Discard edits and the error.
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.values = self.pristine.clone();
        self.error = None;
    }

    /// Field markup for the dialog body, preceded by the error banner if any.
    pub fn markup(&self) -> Vec<Markup> {
        let mut out = Vec::with_capacity(S::FIELDS.len() + 1);
        if let Some(error) = &self.error {
            out.push(
                Markup::element("div")
                    .attr("role", "alert")
                    .class("mb-4 p-3 bg-red-50 text-red-700 rounded-md text-sm")
                    .child(Markup::text(error.to_string())),
            );
        }
        out.extend(S::FIELDS.iter().map(|field| field_markup(field, self.get(field.id))));
        out
    }
}

/// Label plus widget for one field.
pub fn field_markup(field: &FieldSpec, value: &str) -> Markup {
    let label_text = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };
    let label = Markup::element("label")
        .attr("for", field.id)
        .class("block text-sm font-medium text-gray-700 mb-1")
        .child(Markup::text(label_text));

    let mut widget = match field.kind {
        FieldKind::Select(options) => Markup::element("select").children(options.iter().map(|option| {
            Markup::element("option")
                .attr("value", *option)
                .child(Markup::text(*option))
        })),
        FieldKind::TextArea { rows } => Markup::element("textarea").attr("rows", rows.to_string()),
        kind => {
            let mut input = Markup::element("input").attr("type", kind.input_type().unwrap_or("text"));
            match kind {
                FieldKind::Number { min, max, step } => {
                    input = input.attr("min", min.to_string()).attr("step", step.to_string());
                    if let Some(max) = max {
                        input = input.attr("max", max.to_string());
                    }
                }
                FieldKind::Range { min, max, step } => {
                    input = input
                        .attr("min", min.to_string())
                        .attr("max", max.to_string())
                        .attr("step", step.to_string());
                }
                _ => {}
            }
            input
        }
    };
    widget = widget
        .attr("id", field.id)
        .attr("value", value)
        .class("w-full px-3 py-2 border border-gray-300 rounded-md");
    if field.required {
        widget = widget.attr("required", "");
    }

    Markup::element("div").child(label).child(widget)
}

/// Raw value of `field`, empty when absent.
pub(crate) fn text(values: &FormValues, field: &str) -> String {
    values.get(field).cloned().unwrap_or_default()
}

/// Decimal value; blank means zero.
pub(crate) fn number(values: &FormValues, field: &str, label: &'static str) -> Result<f64, FormError> {
    let raw = values.get(field).map_or("", |v| v.trim());
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(FormError::InvalidNumber(label))
}

/// Whole percentage in `0..=100`; blank means zero.
pub(crate) fn percent(values: &FormValues, field: &str, label: &'static str) -> Result<u8, FormError> {
    let value = number(values, field, label)?.round().clamp(0.0, 100.0);
    // Clamped to 0..=100 above, so the cast is lossless.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = value as u8;
    Ok(percent)
}

/// Optional ISO date.
pub(crate) fn date(values: &FormValues, field: &str, label: &'static str) -> Result<Option<NaiveDate>, FormError> {
    let raw = values.get(field).map_or("", |v| v.trim());
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FormError::InvalidFormat {
            field: label,
            expected: "YYYY-MM-DD",
        })
}

/// Option of a select field.
pub(crate) fn choice<T: Default>(
    values: &FormValues,
    field: &str,
    label: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, FormError> {
    match values.get(field).map(String::as_str) {
        None | Some("") => Ok(T::default()),
        Some(raw) => parse(raw).ok_or(FormError::InvalidChoice(label)),
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Build a value map from `(field, value)` pairs.
pub(crate) fn values_of<const N: usize>(pairs: [(&str, String); N]) -> FormValues {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}
