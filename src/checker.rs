use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use crate::api::AvailabilityClient;
use crate::notify::{new_slot_message, WebhookNotifier};
use crate::storage::NotifiedDates;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRecord {
    pub date: NaiveDate,
    pub available: u32,
    pub capacity: u32,
}

/// What happened for one date of the range. "No data" and a failed query
/// both drop the date from the run's output, but they are distinct outcomes
/// so the report can tell an empty answer from a broken request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOutcome {
    Skipped,
    Available { newly_notified: bool },
    Full { retracted: bool },
    NoData,
    QueryFailed,
}

#[derive(Debug, Default)]
pub struct RunReport {
    /// Every date currently reporting available > 0, in range order.
    pub available: Vec<AvailabilityRecord>,
    pub outcomes: Vec<(NaiveDate, DateOutcome)>,
}

impl RunReport {
    pub fn newly_notified(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DateOutcome::Available { newly_notified: true }))
            .count()
    }

    pub fn retractions(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DateOutcome::Full { retracted: true }))
            .count()
    }
}

pub struct Checker<'a> {
    pub client: &'a AvailabilityClient,
    pub notifier: &'a WebhookNotifier,
    pub booking_url: &'a str,
    pub request_delay: Duration,
}

impl Checker<'_> {
    /// Walks the range inclusively, queries each non-skipped date, and
    /// notifies for dates that opened up since the caller's `notified` set
    /// was last saved. The set is mutated in place: newly-available dates go
    /// in, dates that reverted to full come out (so a later re-opening
    /// notifies again). A date is marked notified as soon as a notification
    /// is attempted, delivered or not.
    pub fn check_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        skip: &HashSet<NaiveDate>,
        notified: &mut NotifiedDates,
    ) -> RunReport {
        let mut report = RunReport::default();

        for date in start.iter_days().take_while(|d| *d <= end) {
            if skip.contains(&date) {
                info!("{date} - skipped");
                report.outcomes.push((date, DateOutcome::Skipped));
                continue;
            }

            let outcome = match self.client.fetch(date) {
                Err(err) => {
                    warn!("{date} - query failed: {err}");
                    DateOutcome::QueryFailed
                }
                Ok(None) => {
                    info!("{date} - no data");
                    DateOutcome::NoData
                }
                Ok(Some(slot)) if slot.available > 0 => {
                    report.available.push(AvailabilityRecord {
                        date,
                        available: slot.available,
                        capacity: slot.capacity,
                    });
                    if notified.contains(date) {
                        info!("{date} - still available: {} (already notified)", slot.available);
                        DateOutcome::Available {
                            newly_notified: false,
                        }
                    } else {
                        info!("{date} - NEW SLOT: {} of {}", slot.available, slot.capacity);
                        self.notifier
                            .send(&new_slot_message(date, &slot, self.booking_url));
                        notified.insert(date);
                        DateOutcome::Available {
                            newly_notified: true,
                        }
                    }
                }
                Ok(Some(slot)) => {
                    info!("{date} - full ({}/{})", slot.used, slot.capacity);
                    let retracted = notified.remove(date);
                    if retracted {
                        info!("{date} - now full, cleared from notified list");
                    }
                    DateOutcome::Full { retracted }
                }
            };
            report.outcomes.push((date, outcome));

            // Pace the remote API. Skipped dates never hit it, so they
            // don't pay the delay either.
            if !self.request_delay.is_zero() {
                thread::sleep(self.request_delay);
            }
        }

        report
    }
}
