// furrow_market/src/models/validation.rs

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::errors::FieldError;

/// Which required set a listing is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
  Draft,
  Product,
}

impl SchemaKind {
  pub fn required_fields(self) -> &'static [&'static str] {
    match self {
      SchemaKind::Draft => &["title", "cropType"],
      SchemaKind::Product => &[
        "title",
        "cropType",
        "qualityGrade",
        "quantityAvailable",
        "unit",
        "pricePerUnit",
        "harvestDate",
        "location",
        "images",
      ],
    }
  }
}

pub fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
  let mut error = ValidationError::new(code);
  error.message = Some(message.into());
  error
}

/// Flattens validator output into `{field, message}` pairs keyed by JSON
/// field name, sorted by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
  let mut out = Vec::new();
  collect(errors, None, &mut out);
  out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
  out.dedup();
  out
}

fn collect(errors: &ValidationErrors, prefix: Option<&str>, out: &mut Vec<FieldError>) {
  for (field, kind) in errors.errors() {
    let name = to_camel_case(&field.to_string());
    let path = match prefix {
      Some(p) => format!("{}.{}", p, name),
      None => name,
    };
    match kind {
      ValidationErrorsKind::Field(list) => {
        for error in list {
          let message = match &error.message {
            Some(m) => m.to_string(),
            None => format!("failed '{}' check", error.code),
          };
          out.push(FieldError::new(path.clone(), message));
        }
      }
      // Flattened structs report under their own field names.
      ValidationErrorsKind::Struct(inner) => collect(inner, prefix, out),
      ValidationErrorsKind::List(items) => {
        for (idx, inner) in items {
          let item_path = format!("{}[{}]", path, idx);
          collect(inner, Some(item_path.as_str()), out);
        }
      }
    }
  }
}

fn to_camel_case(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut upper_next = false;
  for ch in name.chars() {
    if ch == '_' {
      upper_next = !out.is_empty();
    } else if upper_next {
      out.extend(ch.to_uppercase());
      upper_next = false;
    } else {
      out.push(ch);
    }
  }
  out
}
