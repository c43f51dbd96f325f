//! Scripted collaborators for detector and loop tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use prusalink::{
    ClientError, FileRefs, JobFile, PrinterApi, PrinterJob, PrinterState, PrinterStatus, StatusMessage,
};

use crate::webhooks::Notifier;

pub fn job(id: u64, display_name: &str, time_remaining: Option<i64>) -> PrinterJob {
    PrinterJob {
        id,
        state: PrinterState::Printing,
        progress: 0.0,
        time_remaining,
        time_printing: Some(0),
        file: JobFile {
            name: format!("{id}.BGC"),
            display_name: Some(display_name.to_string()),
            path: Some("/usb".into()),
            size: Some(1024),
            m_timestamp: None,
            refs: FileRefs {
                icon: Some(format!("/thumb/s/usb/{id}.bgcode")),
                thumbnail: Some(format!("/thumb/l/usb/{id}.bgcode")),
                download: Some(format!("/usb/{id}.bgcode")),
            },
        },
    }
}

fn status(state: PrinterState, message: Option<String>) -> PrinterStatus {
    PrinterStatus {
        state,
        temp_bed: None,
        target_bed: None,
        temp_nozzle: None,
        target_nozzle: None,
        axis_z: None,
        axis_x: None,
        axis_y: None,
        flow: None,
        speed: None,
        fan_hotend: None,
        fan_print: None,
        status_printer: message.map(|m| StatusMessage { ok: false, message: m }),
        status_connect: None,
    }
}

fn refused() -> ClientError {
    ClientError::Status {
        endpoint: "/api/v1/status",
        status: 503,
        reason: "Service Unavailable".into(),
    }
}

pub struct FakePrinter {
    state: Mutex<PrinterState>,
    message: Mutex<Option<String>>,
    job: Mutex<Option<PrinterJob>>,
    failing: AtomicBool,
    job_failing: AtomicBool,
    job_calls: AtomicUsize,
    status_calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakePrinter {
    pub fn new(state: PrinterState) -> Self {
        Self {
            state: Mutex::new(state),
            message: Mutex::new(None),
            job: Mutex::new(None),
            failing: AtomicBool::new(false),
            job_failing: AtomicBool::new(false),
            job_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn set_state(&self, st: PrinterState) {
        *self.state.lock().unwrap() = st;
    }

    pub fn set_printer_message(&self, msg: Option<&str>) {
        *self.message.lock().unwrap() = msg.map(str::to_string);
    }

    pub fn set_job(&self, job: Option<PrinterJob>) {
        *self.job.lock().unwrap() = job;
    }

    pub fn set_failing(&self, v: bool) {
        self.failing.store(v, Ordering::SeqCst);
    }

    pub fn set_job_failing(&self, v: bool) {
        self.job_failing.store(v, Ordering::SeqCst);
    }

    /// Makes every status fetch take `d`.
    pub fn set_delay(&self, d: Duration) {
        *self.delay.lock().unwrap() = Some(d);
    }

    pub fn job_calls(&self) -> usize {
        self.job_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrinterApi for FakePrinter {
    async fn fetch_status(&self) -> prusalink::Result<PrinterStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(refused());
        }
        let st = *self.state.lock().unwrap();
        let msg = self.message.lock().unwrap().clone();
        Ok(status(st, msg))
    }

    async fn fetch_job(&self) -> prusalink::Result<Option<PrinterJob>> {
        self.job_calls.fetch_add(1, Ordering::SeqCst);
        if self.job_failing.load(Ordering::SeqCst) {
            return Err(refused());
        }
        Ok(self.job.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, v: bool) {
        self.failing.store(v, Ordering::SeqCst);
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, message: &str) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("Failed to send webhook: 500 Internal Server Error");
        }
        self.sent.lock().unwrap().push(message.to_string());
        Ok(())
    }
}
