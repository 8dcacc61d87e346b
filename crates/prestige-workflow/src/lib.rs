//! The card generator: content form, candidate review, editing, print.
//!
//! [`Workflow`] owns the session state and talks to a
//! [`ProjectStore`](prestige_core::store::ProjectStore) and a
//! [`ProposalService`](prestige_core::proposal::ProposalService). Slow work
//! (theme and biography generation, the print countdown) runs on spawned
//! tokio tasks; the front-end polls for results once per frame.

#![allow(async_fn_in_trait)]

mod print;
mod workflow;

pub mod error;
pub mod export;

pub use error::{Error, Result};
pub use export::{CardExporter, ExportJob, ExportTarget};
pub use print::{COUNTDOWN_TICKS, PrintEvent, PrintJob};
pub use workflow::{Mode, ProposalEvent, SaveOutcome, Step, Workflow};
