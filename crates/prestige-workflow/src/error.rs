//! Error type for `prestige-workflow`.

use thiserror::Error;

use crate::workflow::Step;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  /// The operation is not available in the current step.
  #[error("`{op}` is not available in the {step:?} step")]
  InvalidStep { op: &'static str, step: Step },

  /// Editing an existing project has no candidate list to return to.
  #[error("cannot go back while editing an existing project")]
  NoWayBack,

  #[error("a generation request is already running")]
  Busy,

  #[error(transparent)]
  Validation(#[from] prestige_core::error::ValidationError),

  #[error("no candidate or template with id {0}")]
  UnknownTheme(uuid::Uuid),

  #[error("could not read logo: {0}")]
  Logo(#[from] std::io::Error),

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  #[error("export failed: {0}")]
  Export(#[source] BoxError),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub(crate) fn export(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Export(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
