//! [`SvgExporter`]: writes cards and sheets into the export directory and
//! hands print sheets to an external command.

use std::{
  io,
  path::{Path, PathBuf},
};

use prestige_core::render::PrintSheet;
use prestige_workflow::{CardExporter, ExportJob, ExportTarget};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::svg::{self, SvgError};

#[derive(Debug, Error)]
pub enum ExportError {
  #[error(transparent)]
  Svg(#[from] SvgError),

  #[error("could not write {path}: {source}")]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("could not run print command `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source:  io::Error,
  },

  #[error("print command `{command}` exited with {status}")]
  PrintCommand { command: String, status: std::process::ExitStatus },
}

#[derive(Debug, Clone)]
pub struct SvgExporter {
  dir:           PathBuf,
  print_command: Option<String>,
  sheet:         PrintSheet,
}

impl SvgExporter {
  pub fn new(dir: impl Into<PathBuf>, print_command: Option<String>) -> Self {
    Self {
      dir: dir.into(),
      print_command: print_command.filter(|c| !c.trim().is_empty()),
      sheet: PrintSheet::A4,
    }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  async fn write(&self, job: &ExportJob) -> Result<PathBuf, ExportError> {
    let document = match job.target {
      ExportTarget::CardImage => svg::card_document(&job.info, &job.theme)?,
      ExportTarget::SheetDocument | ExportTarget::PrintSheet => {
        svg::sheet_document(&job.info, &job.theme, &self.sheet)?
      }
    };
    let path = self.dir.join(format!("{}.svg", job.file_stem));
    let written = async {
      tokio::fs::create_dir_all(&self.dir).await?;
      tokio::fs::write(&path, document).await
    };
    written
      .await
      .map_err(|source| ExportError::Write { path: path.clone(), source })?;
    debug!(path = %path.display(), target = ?job.target, "svg written");
    Ok(path)
  }

  async fn send_to_printer(&self, path: &Path) -> Result<(), ExportError> {
    let Some(command) = &self.print_command else {
      info!(path = %path.display(), "no print command configured; sheet left on disk");
      return Ok(());
    };
    let mut parts = command.split_whitespace();
    let program = parts.next().unwrap_or_default();
    let status = Command::new(program)
      .args(parts)
      .arg(path)
      .kill_on_drop(true)
      .status()
      .await
      .map_err(|source| ExportError::Spawn { command: command.clone(), source })?;
    if !status.success() {
      return Err(ExportError::PrintCommand { command: command.clone(), status });
    }
    Ok(())
  }
}

impl CardExporter for SvgExporter {
  type Error = ExportError;

  async fn export(&self, job: ExportJob) -> Result<PathBuf, ExportError> {
    let path = self.write(&job).await?;
    if job.target == ExportTarget::PrintSheet {
      self.send_to_printer(&path).await?;
    }
    Ok(path)
  }
}
