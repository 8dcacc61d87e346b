//! The cancellable print countdown.

use std::{path::PathBuf, sync::Arc, time::Duration};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};

use crate::export::{CardExporter, ExportJob};

/// Seconds counted down before printing.
pub const COUNTDOWN_TICKS: u8 = 3;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintEvent {
  /// Seconds left before the sheet is sent.
  Tick(u8),
  Printed(PathBuf),
  Failed(String),
}

impl PrintEvent {
  pub fn is_final(&self) -> bool { !matches!(self, Self::Tick(_)) }
}

/// Handle to a running countdown. Dropping it cancels the job; a sheet is
/// only printed if the handle is still alive when the countdown ends.
#[derive(Debug)]
pub struct PrintJob {
  task:   JoinHandle<()>,
  events: mpsc::UnboundedReceiver<PrintEvent>,
  last:   Option<PrintEvent>,
}

impl PrintJob {
  /// Start counting down; after [`COUNTDOWN_TICKS`] seconds `exporter`
  /// receives `job`.
  pub fn start<E>(exporter: Arc<E>, job: ExportJob) -> Self
  where
    E: CardExporter + 'static,
  {
    let (tx, events) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
      for left in (1..=COUNTDOWN_TICKS).rev() {
        if tx.send(PrintEvent::Tick(left)).is_err() {
          return;
        }
        tokio::time::sleep(TICK).await;
      }
      let event = match exporter.export(job).await {
        Ok(path) => {
          info!(path = %path.display(), "sheet sent to printer");
          PrintEvent::Printed(path)
        }
        Err(error) => {
          warn!(%error, "printing failed");
          PrintEvent::Failed(error.to_string())
        }
      };
      let _ = tx.send(event);
    });
    Self { task, events, last: None }
  }

  /// Next event without waiting.
  pub fn try_next(&mut self) -> Option<PrintEvent> {
    let event = self.events.try_recv().ok()?;
    self.last = Some(event.clone());
    Some(event)
  }

  /// Wait for the next event. `None` once the job has ended.
  pub async fn next(&mut self) -> Option<PrintEvent> {
    let event = self.events.recv().await?;
    self.last = Some(event.clone());
    Some(event)
  }

  /// Most recent event seen by the caller.
  pub fn last(&self) -> Option<&PrintEvent> { self.last.as_ref() }

  pub fn cancel(&self) { self.task.abort(); }
}

impl Drop for PrintJob {
  fn drop(&mut self) { self.task.abort(); }
}
