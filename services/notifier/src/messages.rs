//! Notification wording. The detector decides *what* to say; a
//! `MessageCatalog` decides *how* it reads.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;

use crate::duration::Breakdown;

pub trait MessageCatalog: Send + Sync {
    fn printing(&self, job_name: Option<&str>, remaining: Option<Breakdown>) -> String;
    fn paused(&self) -> String;
    fn finished(&self, job_name: Option<&str>) -> String;
    fn problem(&self, detail: Option<&str>) -> String;
    fn duration(&self, d: &Breakdown) -> String;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Pl,
}

impl Locale {
    pub fn catalog(self) -> Arc<dyn MessageCatalog> {
        match self {
            Locale::En => Arc::new(English),
            Locale::Pl => Arc::new(Polish),
        }
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "pl" | "pl-pl" => Ok(Locale::Pl),
            other => bail!("NOTIFY_LOCALE: unsupported locale {other:?} (expected en or pl)"),
        }
    }
}

pub struct English;

impl English {
    fn unit(n: u64, one: &str, many: &str) -> String {
        format!("{n} {}", if n == 1 { one } else { many })
    }
}

impl MessageCatalog for English {
    fn printing(&self, job_name: Option<&str>, remaining: Option<Breakdown>) -> String {
        match (job_name, remaining) {
            (Some(name), Some(r)) => format!(
                "🖨️ Print started: {name}. Time remaining: {}.",
                self.duration(&r)
            ),
            (Some(name), None) => format!("🖨️ Print started: {name}."),
            (None, _) => "🖨️ Print started!".to_string(),
        }
    }

    fn paused(&self) -> String {
        "⏸️ Print paused.".to_string()
    }

    fn finished(&self, job_name: Option<&str>) -> String {
        match job_name {
            Some(name) => format!("✅ Print finished successfully: {name}"),
            None => "✅ Print finished successfully!".to_string(),
        }
    }

    fn problem(&self, detail: Option<&str>) -> String {
        format!(
            "⚠️ Attention! A problem occurred: {}",
            detail.unwrap_or("Unknown error.")
        )
    }

    fn duration(&self, d: &Breakdown) -> String {
        [
            Self::unit(d.days, "day", "days"),
            Self::unit(d.hours, "hour", "hours"),
            Self::unit(d.minutes, "minute", "minutes"),
            Self::unit(d.seconds, "second", "seconds"),
        ]
        .join(" ")
    }
}

pub struct Polish;

impl Polish {
    /// 1 → one, 2-4 (not 12-14) → few, everything else → many.
    fn unit(n: u64, one: &str, few: &str, many: &str) -> String {
        let word = if n == 1 {
            one
        } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
            few
        } else {
            many
        };
        format!("{n} {word}")
    }
}

impl MessageCatalog for Polish {
    fn printing(&self, job_name: Option<&str>, remaining: Option<Breakdown>) -> String {
        match (job_name, remaining) {
            (Some(name), Some(r)) => format!(
                "🖨️ Rozpoczynam druk: {name}. Pozostały czas: {}.",
                self.duration(&r)
            ),
            (Some(name), None) => format!("🖨️ Rozpoczynam druk: {name}."),
            (None, _) => "🖨️ Rozpoczynam druk!".to_string(),
        }
    }

    fn paused(&self) -> String {
        "⏸️ Druk został wstrzymany.".to_string()
    }

    fn finished(&self, job_name: Option<&str>) -> String {
        match job_name {
            Some(name) => format!("✅ Druk zakończony pomyślnie: {name}"),
            None => "✅ Druk zakończony pomyślnie!".to_string(),
        }
    }

    fn problem(&self, detail: Option<&str>) -> String {
        format!(
            "⚠️ Uwaga! Wystąpił problem: {}",
            detail.unwrap_or("Nieznany błąd.")
        )
    }

    fn duration(&self, d: &Breakdown) -> String {
        [
            Self::unit(d.days, "dzień", "dni", "dni"),
            Self::unit(d.hours, "godzina", "godziny", "godzin"),
            Self::unit(d.minutes, "minuta", "minuty", "minut"),
            Self::unit(d.seconds, "sekunda", "sekundy", "sekund"),
        ]
        .join(" ")
    }
}
