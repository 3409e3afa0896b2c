use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{Local, NaiveDate};
use color_eyre::Result;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::checker::AvailabilityRecord;

#[derive(Serialize, Deserialize, Default)]
struct NotifiedFile {
    last_updated: Option<String>,
    #[serde(default)]
    notified_dates: Vec<NaiveDate>,
}

/// Dates we have already pinged Discord about. Survives across runs so a
/// date that stays open doesn't alert on every invocation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotifiedDates {
    dates: HashSet<NaiveDate>,
}

impl NotifiedDates {
    /// A missing, unreadable, or corrupt state file degrades to "nothing
    /// notified yet" rather than failing the run.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!("could not read {}: {err}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str::<NotifiedFile>(&data) {
            Ok(file) => Self {
                dates: file.notified_dates.into_iter().collect(),
            },
            Err(err) => {
                warn!("ignoring corrupt notified-dates file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut notified_dates: Vec<_> = self.dates.iter().copied().collect();
        notified_dates.sort_unstable();
        let file = NotifiedFile {
            last_updated: Some(Local::now().to_rfc3339()),
            notified_dates,
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.dates.remove(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl FromIterator<NaiveDate> for NotifiedDates {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

#[derive(Serialize)]
struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    checked_at: String,
    date_range: DateRange,
    skip_dates: Vec<NaiveDate>,
    available_dates_now: &'a [AvailabilityRecord],
    total_notified_dates: usize,
}

/// Overwrites the summary file with this run's snapshot of availability.
pub fn write_run_summary(
    path: &Path,
    start: NaiveDate,
    end: NaiveDate,
    skip_dates: &HashSet<NaiveDate>,
    available: &[AvailabilityRecord],
    total_notified_dates: usize,
) -> Result<()> {
    let mut skip_dates: Vec<_> = skip_dates.iter().copied().collect();
    skip_dates.sort_unstable();
    let summary = RunSummary {
        checked_at: Local::now().to_rfc3339(),
        date_range: DateRange { start, end },
        skip_dates,
        available_dates_now: available,
        total_notified_dates,
    };
    fs::write(path, serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notified.json");

        let notified: NotifiedDates = [date("2025-11-15"), date("2025-12-01")]
            .into_iter()
            .collect();
        notified.save(&path).unwrap();

        assert_eq!(NotifiedDates::load(&path), notified);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let notified = NotifiedDates::load(&dir.path().join("nope.json"));
        assert!(notified.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notified.json");
        fs::write(&path, "{{{ not json").unwrap();
        assert!(NotifiedDates::load(&path).is_empty());
    }

    #[test]
    fn saved_file_has_timestamp_and_sorted_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notified.json");

        let notified: NotifiedDates = [date("2025-12-01"), date("2025-11-15")]
            .into_iter()
            .collect();
        notified.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["last_updated"].is_string());
        assert_eq!(
            value["notified_dates"],
            serde_json::json!(["2025-11-15", "2025-12-01"])
        );
    }

    #[test]
    fn run_summary_matches_expected_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        let available = vec![AvailabilityRecord {
            date: date("2025-11-15"),
            available: 2,
            capacity: 10,
        }];
        let skip: HashSet<_> = [date("2025-11-16")].into_iter().collect();
        write_run_summary(
            &path,
            date("2025-11-15"),
            date("2025-11-16"),
            &skip,
            &available,
            1,
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["checked_at"].is_string());
        assert_eq!(value["date_range"]["start"], "2025-11-15");
        assert_eq!(value["date_range"]["end"], "2025-11-16");
        assert_eq!(value["skip_dates"], serde_json::json!(["2025-11-16"]));
        assert_eq!(value["available_dates_now"][0]["available"], 2);
        assert_eq!(value["available_dates_now"][0]["capacity"], 10);
        assert_eq!(value["total_notified_dates"], 1);
    }
}
