//! The exporter collaborator: turns a card into a file.

use std::{future::Future, path::PathBuf};

use prestige_core::model::{ContactInfo, Theme};

/// What to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
  /// A snapshot of one card.
  CardImage,
  /// An A4 sheet of ten cards, kept as a document.
  SheetDocument,
  /// An A4 sheet handed to the printer.
  PrintSheet,
}

impl ExportTarget {
  /// File name without extension, e.g. `wizytowka-Acme`.
  pub fn file_stem(&self, info: &ContactInfo) -> String {
    let prefix = match self {
      Self::CardImage => "wizytowka",
      Self::SheetDocument | Self::PrintSheet => "wizytowki",
    };
    format!("{prefix}-{}", file_safe(&info.company_name))
  }
}

fn file_safe(company: &str) -> String {
  let company = company.trim();
  if company.is_empty() {
    return "projekt".to_owned();
  }
  company
    .chars()
    .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '-' })
    .collect()
}

/// Everything an exporter needs. Owned so it can cross into a spawned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportJob {
  pub target:    ExportTarget,
  pub info:      ContactInfo,
  pub theme:     Theme,
  pub file_stem: String,
}

impl ExportJob {
  pub fn new(target: ExportTarget, info: ContactInfo, theme: Theme) -> Self {
    let file_stem = target.file_stem(&info);
    Self { target, info, theme, file_stem }
  }
}

/// Renders cards to files. Returns the path that was written.
pub trait CardExporter: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn export(
    &self,
    job: ExportJob,
  ) -> impl Future<Output = Result<PathBuf, Self::Error>> + Send + '_;
}
