//! Settings form definitions.
//!
//! Block services describe the fields used to edit their settings; the
//! form is rendered by the surrounding application.

use serde::Serialize;

/// One form field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Single-line text input.
    Text { name: String },
    /// Multi-line text input.
    Textarea { name: String },
    /// Named group of nested fields.
    Group { name: String, fields: Vec<FieldSpec> },
}

impl FieldSpec {
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::Text { name: name.into() }
    }

    #[must_use]
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::Textarea { name: name.into() }
    }

    #[must_use]
    pub fn group(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self::Group {
            name: name.into(),
            fields,
        }
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name } | Self::Textarea { name } | Self::Group { name, .. } => name,
        }
    }
}

/// Receiver of form fields.
pub trait FormBuilder {
    /// Append a field.
    fn add(&mut self, field: FieldSpec);
}

/// Collected form fields in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Form {
    fields: Vec<FieldSpec>,
}

impl Form {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Top-level field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<FieldSpec> {
        self.fields
    }
}

impl FormBuilder for Form {
    fn add(&mut self, field: FieldSpec) {
        self.fields.push(field);
    }
}
