//! Field rendering for schema-driven forms.

use dioxus::prelude::*;
use siteline_core::{FieldKind, FieldSpec, FormSchema, FormState, FormValues};

use super::BaseModal;

/// `min`, `max` and `step` attributes of a widget.
#[derive(Debug, Default, PartialEq, Eq)]
struct Bounds {
    min: Option<String>,
    max: Option<String>,
    step: Option<String>,
}

fn bounds(kind: FieldKind) -> Bounds {
    match kind {
        FieldKind::Number { min, max, step } => Bounds {
            min: Some(min.to_string()),
            max: max.map(|max| max.to_string()),
            step: Some(step.to_string()),
        },
        FieldKind::Range { min, max, step } => Bounds {
            min: Some(min.to_string()),
            max: Some(max.to_string()),
            step: Some(step.to_string()),
        },
        _ => Bounds::default(),
    }
}

/// Bare file name of a picked file. Webviews report either a full path or
/// a `C:\fakepath\` placeholder.
fn file_name(picked: &str) -> &str {
    picked.rsplit(['/', '\\']).next().unwrap_or(picked)
}

/// Labeled widgets for `fields`, preceded by an error banner when `error`
/// is set. Edits are reported as `(field id, value)`.
#[component]
pub fn SchemaFields(
    fields: &'static [FieldSpec],
    values: FormValues,
    error: Option<String>,
    on_change: EventHandler<(String, String)>,
) -> Element {
    rsx! {
        if let Some(error) = error {
            div {
                role: "alert",
                class: "form-error mb-4 p-3 bg-red-50 text-red-700 rounded-md text-sm",
                "{error}"
            }
        }
        div {
            class: "form-fields space-y-4",
            for field in fields.iter().copied() {
                FieldRow {
                    key: "{field.id}",
                    field,
                    value: values.get(field.id).cloned().unwrap_or_default(),
                    on_change,
                }
            }
        }
    }
}

#[component]
fn FieldRow(field: FieldSpec, value: String, on_change: EventHandler<(String, String)>) -> Element {
    let id = field.id;
    let label = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };
    let emit = move |value: String| on_change.call((id.to_string(), value));

    let widget = match field.kind {
        FieldKind::Select(options) => rsx! {
            select {
                id,
                class: "form-input",
                required: field.required,
                value: "{value}",
                onchange: move |evt| emit(evt.value()),
                for choice in options.iter().copied() {
                    option { value: choice, selected: choice == value, "{choice}" }
                }
            }
        },
        FieldKind::TextArea { rows } => rsx! {
            textarea {
                id,
                class: "form-input",
                rows: rows.to_string(),
                required: field.required,
                value: "{value}",
                oninput: move |evt| emit(evt.value()),
            }
        },
        FieldKind::File => rsx! {
            input {
                id,
                r#type: "file",
                class: "form-input",
                required: field.required,
                onchange: move |evt| emit(file_name(&evt.value()).to_string()),
            }
            if !value.is_empty() {
                p { class: "form-hint", "Selected: {value}" }
            }
        },
        kind => {
            let Bounds { min, max, step } = bounds(kind);
            let input_type = kind.input_type().unwrap_or("text");
            rsx! {
                input {
                    id,
                    r#type: input_type,
                    class: "form-input",
                    required: field.required,
                    min,
                    max,
                    step,
                    value: "{value}",
                    oninput: move |evt| emit(evt.value()),
                }
            }
        }
    };

    rsx! {
        div {
            class: "form-field",
            label {
                r#for: id,
                class: "form-label",
                "{label}"
                if matches!(field.kind, FieldKind::Range { .. }) {
                    span { class: "form-hint", " {value}%" }
                }
            }
            {widget}
        }
    }
}

/// Dialog for a schema-driven form.
///
/// Cancelling discards edits. A submission that fails validation keeps the
/// dialog open with the error shown above the fields; a valid one is passed
/// to `on_submit` and the dialog closes.
pub fn form_dialog<S>(
    mut form: Signal<FormState<S>>,
    is_open: bool,
    on_close: EventHandler<()>,
    on_submit: EventHandler<S::Record>,
) -> Element
where
    S: FormSchema + 'static,
    S::Record: 'static,
{
    let state = form.read();
    let title = state.title();
    let submit_text = state.submit_label();
    let size = state.size();
    let fields = state.fields();
    let values = state.values().clone();
    let error = state.error().map(ToString::to_string);
    drop(state);

    rsx! {
        BaseModal {
            is_open,
            title,
            submit_text,
            size,
            on_close: move |()| {
                form.write().cancel();
                on_close.call(());
            },
            on_submit: move |_: FormEvent| -> anyhow::Result<()> {
                let record = form.write().submit();
                if let Some(record) = record {
                    on_submit.call(record);
                    on_close.call(());
                }
                Ok(())
            },
            SchemaFields {
                fields,
                values,
                error,
                on_change: move |(field, value): (String, String)| form.write().set(&field, value),
            }
        }
    }
}
