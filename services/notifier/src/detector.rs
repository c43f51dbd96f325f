//! Edge-triggered transition detection over printer states.

use std::sync::Arc;

use anyhow::{Context, Result};
use kvstore::KvStore;
use prusalink::{PrinterApi, PrinterState, PrinterStatus};
use tracing::{debug, info};

use crate::duration::Breakdown;
use crate::messages::MessageCatalog;
use crate::persisted::{self, PersistedState};
use crate::webhooks::Notifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Printing,
    Paused,
    Finished,
    Problem,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub prev: Option<PrinterState>,
    pub curr: PrinterState,
    pub notified: Option<Notice>,
}

pub struct Detector {
    printer: Arc<dyn PrinterApi>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn KvStore>,
    messages: Arc<dyn MessageCatalog>,
}

impl Detector {
    pub fn new(
        printer: Arc<dyn PrinterApi>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KvStore>,
        messages: Arc<dyn MessageCatalog>,
    ) -> Self {
        Self {
            printer,
            notifier,
            store,
            messages,
        }
    }

    /// One poll-and-decide pass. Any error leaves the persisted state
    /// untouched so the same transition is retried next tick.
    pub async fn tick(&self) -> Result<TickOutcome> {
        let status = self.printer
            .fetch_status()
            .await
            .context("Failed to fetch printer status")?;
        let persisted = PersistedState::load(&*self.store)
            .await
            .context("Failed to read persisted state")?;

        let prev = persisted.last_state;
        let curr = status.state;
        let changed = prev.map(PrinterState::coalesced) != Some(curr.coalesced());
        debug!(prev = ?prev, curr = %curr, changed, "detector: observed");

        let notified = match curr {
            PrinterState::Printing if changed => {
                self.start_printing().await?;
                Some(Notice::Printing)
            }
            PrinterState::Paused if changed => {
                self.send(&self.messages.paused()).await?;
                Some(Notice::Paused)
            }
            PrinterState::Finished if changed => {
                debug!(
                    job_id = ?persisted.last_job_id,
                    thumbnail = ?persisted.last_job_thumbnail,
                    "detector: finishing last known job"
                );
                let msg = self.messages.finished(persisted.last_job_name.as_deref());
                self.send(&msg).await?;
                Some(Notice::Finished)
            }
            PrinterState::Error | PrinterState::Attention if changed => {
                self.send(&self.problem_message(&status)).await?;
                Some(Notice::Problem)
            }
            _ => None,
        };

        // PRINTING edges already wrote state together with the job fields.
        if notified != Some(Notice::Printing) {
            persisted::save_state(&*self.store, curr.coalesced())
                .await
                .context("Failed to persist printer state")?;
        }

        if changed {
            info!(prev = ?prev, curr = %curr, notified = ?notified, "detector: transition handled");
        }

        Ok(TickOutcome { prev, curr, notified })
    }

    async fn start_printing(&self) -> Result<()> {
        let job = self.printer
            .fetch_job()
            .await
            .context("Failed to fetch printer job")?;

        let msg = match &job {
            Some(j) => self.messages.printing(
                Some(j.file.label()),
                j.time_remaining.map(Breakdown::from_millis),
            ),
            None => self.messages.printing(None, None),
        };
        self.send(&msg).await?;

        persisted::save_printing(&*self.store, job.as_ref())
            .await
            .context("Failed to persist printing state")?;
        if let Some(j) = &job {
            info!(job_id = j.id, name = %j.file.label(), "detector: job recorded");
        }
        Ok(())
    }

    fn problem_message(&self, status: &PrinterStatus) -> String {
        self.messages.problem(status.printer_message())
    }

    async fn send(&self, message: &str) -> Result<()> {
        self.notifier
            .notify(message)
            .await
            .context("Failed to deliver notification")
    }
}
