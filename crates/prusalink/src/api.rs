use async_trait::async_trait;

use crate::{PrinterJob, PrinterStatus};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status} {reason}")]
    Status {
        endpoint: &'static str,
        status: u16,
        reason: String,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Read side of a PrusaLink printer.
#[async_trait]
pub trait PrinterApi: Send + Sync {
    async fn fetch_status(&self) -> Result<PrinterStatus>;
    /// `None` when the printer reports no active job.
    async fn fetch_job(&self) -> Result<Option<PrinterJob>>;
}
