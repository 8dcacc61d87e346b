//! Error types for `prestige-core`.

use thiserror::Error;

use crate::model::ContactField;

#[derive(Debug, Error)]
pub enum Error {
  #[error("theme has an empty name")]
  EmptyThemeName,

  #[error("invalid colour value: {0:?}")]
  InvalidColor(String),
}

/// Required content fields were left empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", list_fields(.missing))]
pub struct ValidationError {
  pub missing: Vec<ContactField>,
}

fn list_fields(fields: &[ContactField]) -> String {
  fields
    .iter()
    .map(ContactField::label)
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
