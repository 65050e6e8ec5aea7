//! Probe reports: the status of every candidate when all of them are
//! loaded side by side.
//!
//! The fallback loader tries candidates one at a time. For debugging
//! which storage location actually serves an image, the diagnostic panel
//! instead loads every candidate at once and records each outcome here.
//! A candidate that loads (other than the placeholder) is reported so the
//! caller can remember it.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::candidates::CandidateList;

/// Serde support for `Option<Duration>` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[allow(clippy::ref_option)] // signature required by `serialize_with`
    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        duration.map(|d| d.as_secs_f64()).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    serde::de::Error::custom(
                        "duration seconds must be finite, non-negative, and representable as a Duration",
                    )
                })
            })
            .transpose()
    }
}

/// Outcome of probing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Still loading.
    Pending,
    /// Loaded successfully.
    Loaded,
    /// Failed to load.
    Failed,
}

impl ProbeStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Loading",
            Self::Loaded => "Working",
            Self::Failed => "Failed",
        }
    }
}

/// One probed candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeEntry {
    /// The candidate URL.
    pub url: String,
    /// Current outcome.
    pub status: ProbeStatus,
    /// Time from starting the probe to its outcome.
    #[serde(with = "duration_serde", default)]
    pub elapsed: Option<Duration>,
}

/// Entry counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCounts {
    pub loaded: usize,
    pub failed: usize,
    pub pending: usize,
}

/// Status of every candidate for one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    entries: Vec<ProbeEntry>,
    placeholder: String,
}

impl ProbeReport {
    /// Start a report with every candidate pending.
    #[must_use]
    pub fn new(candidates: &CandidateList) -> Self {
        Self {
            entries: candidates
                .iter()
                .map(|url| ProbeEntry {
                    url: url.to_owned(),
                    status: ProbeStatus::Pending,
                    elapsed: None,
                })
                .collect(),
            placeholder: candidates.placeholder().to_owned(),
        }
    }

    /// Record the outcome of probe `index`.
    ///
    /// Returns the URL when it just loaded and is not the placeholder, so
    /// the caller can report a working URL upward. Out-of-range indices
    /// are ignored.
    pub fn record(
        &mut self,
        index: usize,
        status: ProbeStatus,
        elapsed: Option<Duration>,
    ) -> Option<&str> {
        let entry = self.entries.get_mut(index)?;
        entry.status = status;
        entry.elapsed = elapsed;
        let entry = &self.entries[index];
        (status == ProbeStatus::Loaded && entry.url != self.placeholder).then_some(entry.url.as_str())
    }

    /// All entries in candidate order.
    #[must_use]
    pub fn entries(&self) -> &[ProbeEntry] {
        &self.entries
    }

    /// Number of entries in each status.
    #[must_use]
    pub fn counts(&self) -> ProbeCounts {
        self.entries
            .iter()
            .fold(ProbeCounts::default(), |mut counts, entry| {
                match entry.status {
                    ProbeStatus::Pending => counts.pending += 1,
                    ProbeStatus::Loaded => counts.loaded += 1,
                    ProbeStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }

    /// The highest-priority candidate that loaded, excluding the placeholder.
    #[must_use]
    pub fn first_working(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.status == ProbeStatus::Loaded && e.url != self.placeholder)
            .map(|e| e.url.as_str())
    }

    /// Whether every probe has an outcome.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| e.status != ProbeStatus::Pending)
    }

    /// One-line summary, e.g. `2 working, 5 failed, 1 loading`.
    #[must_use]
    pub fn summary(&self) -> String {
        let ProbeCounts {
            loaded,
            failed,
            pending,
        } = self.counts();
        format!("{loaded} working, {failed} failed, {pending} loading")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report() -> ProbeReport {
        ProbeReport::new(&CandidateList::new(["a", "b"], "p"))
    }

    #[test]
    fn starts_pending() {
        let report = report();
        assert_eq!(
            report.counts(),
            ProbeCounts {
                loaded: 0,
                failed: 0,
                pending: 3
            }
        );
        assert!(!report.is_settled());
        assert_eq!(report.summary(), "0 working, 0 failed, 3 loading");
    }

    #[test]
    fn loaded_candidate_is_reported() {
        let mut report = report();
        assert_eq!(report.record(1, ProbeStatus::Loaded, None), Some("b"));
        assert_eq!(report.first_working(), Some("b"));
    }

    #[test]
    fn placeholder_is_never_reported() {
        let mut report = report();
        assert_eq!(report.record(2, ProbeStatus::Loaded, None), None);
        assert_eq!(report.first_working(), None);
        assert_eq!(report.counts().loaded, 1);
    }

    #[test]
    fn failures_and_settling() {
        let mut report = report();
        assert_eq!(
            report.record(0, ProbeStatus::Failed, Some(Duration::from_millis(12))),
            None
        );
        report.record(1, ProbeStatus::Loaded, None);
        report.record(2, ProbeStatus::Loaded, None);
        assert!(report.is_settled());
        assert_eq!(report.summary(), "2 working, 1 failed, 0 loading");
        assert_eq!(report.entries()[0].elapsed, Some(Duration::from_millis(12)));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut report = report();
        assert_eq!(report.record(9, ProbeStatus::Loaded, None), None);
        assert_eq!(report.counts().pending, 3);
    }

    #[test]
    fn first_working_prefers_priority_order() {
        let mut report = report();
        report.record(1, ProbeStatus::Loaded, None);
        report.record(0, ProbeStatus::Loaded, None);
        assert_eq!(report.first_working(), Some("a"));
    }

    #[test]
    fn serializes_elapsed_as_seconds() {
        let mut report = report();
        report.record(0, ProbeStatus::Failed, Some(Duration::from_millis(250)));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entries"][0]["status"], "failed");
        assert!((json["entries"][0]["elapsed"].as_f64().unwrap() - 0.25).abs() < 1e-9);
        assert!(json["entries"][1]["elapsed"].is_null());

        let back: ProbeReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
