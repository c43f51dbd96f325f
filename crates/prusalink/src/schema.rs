use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational phase reported by the printer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrinterState {
    Idle,
    Busy,
    Printing,
    Paused,
    Finished,
    Stopped,
    Error,
    Attention,
    Ready,
}

impl PrinterState {
    pub const ALL: [PrinterState; 9] = [
        PrinterState::Idle,
        PrinterState::Busy,
        PrinterState::Printing,
        PrinterState::Paused,
        PrinterState::Finished,
        PrinterState::Stopped,
        PrinterState::Error,
        PrinterState::Attention,
        PrinterState::Ready,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterState::Idle => "IDLE",
            PrinterState::Busy => "BUSY",
            PrinterState::Printing => "PRINTING",
            PrinterState::Paused => "PAUSED",
            PrinterState::Finished => "FINISHED",
            PrinterState::Stopped => "STOPPED",
            PrinterState::Error => "ERROR",
            PrinterState::Attention => "ATTENTION",
            PrinterState::Ready => "READY",
        }
    }

    /// Dedup key for this state. ERROR and ATTENTION are one "problem"
    /// condition and both collapse to ATTENTION.
    pub fn coalesced(self) -> PrinterState {
        match self {
            PrinterState::Error => PrinterState::Attention,
            other => other,
        }
    }
}

impl fmt::Display for PrinterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown printer state: {0}")]
pub struct UnknownState(pub String);

impl FromStr for PrinterState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrinterState::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: String,
}

/// Printer snapshot from `/api/v1/status`. Field names follow the
/// upstream snake_case schema; camelCase spellings are accepted too.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrinterStatus {
    pub state: PrinterState,
    #[serde(default, alias = "tempBed")]
    pub temp_bed: Option<f64>,
    #[serde(default, alias = "targetBed")]
    pub target_bed: Option<f64>,
    #[serde(default, alias = "tempNozzle")]
    pub temp_nozzle: Option<f64>,
    #[serde(default, alias = "targetNozzle")]
    pub target_nozzle: Option<f64>,
    #[serde(default, alias = "axisZ")]
    pub axis_z: Option<f64>,
    #[serde(default, alias = "axisX")]
    pub axis_x: Option<f64>,
    #[serde(default, alias = "axisY")]
    pub axis_y: Option<f64>,
    #[serde(default)]
    pub flow: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default, alias = "fanHotend")]
    pub fan_hotend: Option<f64>,
    #[serde(default, alias = "fanPrint")]
    pub fan_print: Option<f64>,
    #[serde(default, alias = "statusPrinter")]
    pub status_printer: Option<StatusMessage>,
    #[serde(default, alias = "statusConnect")]
    pub status_connect: Option<StatusMessage>,
}

impl PrinterStatus {
    /// Printer subsystem message, if the snapshot carries a non-blank one.
    pub fn printer_message(&self) -> Option<&str> {
        self.status_printer
            .as_ref()
            .map(|s| s.message.trim())
            .filter(|m| !m.is_empty())
    }
}

/// Envelope of `/api/v1/status`; other top-level sections are ignored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub printer: PrinterStatus,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileRefs {
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub download: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobFile {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub m_timestamp: Option<i64>,
    #[serde(default)]
    pub refs: FileRefs,
}

impl JobFile {
    /// Human-facing name, falling back to the short storage name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Active job from `/api/v1/job`. Times are milliseconds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrinterJob {
    pub id: u64,
    pub state: PrinterState,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub time_remaining: Option<i64>,
    #[serde(default)]
    pub time_printing: Option<i64>,
    pub file: JobFile,
}
