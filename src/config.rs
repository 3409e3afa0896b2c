use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use serde::Deserialize;

const WEBHOOK_PLACEHOLDER: &str = "YOUR_WEBHOOK_URL_HERE";
const WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_webhook_url")]
    pub discord_webhook_url: String,
    #[serde(default = "default_availability_url")]
    pub availability_url: String,
    #[serde(default = "default_booking_url")]
    pub booking_url: String,
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
    #[serde(default = "default_skip_dates")]
    pub skip_dates: HashSet<NaiveDate>,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_notified_path")]
    pub notified_path: PathBuf,
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
}

fn default_webhook_url() -> String {
    WEBHOOK_PLACEHOLDER.into()
}

fn default_availability_url() -> String {
    "https://q.wildlifesanctuaryfca16.com/api/v1/bookings/availability".into()
}

fn default_booking_url() -> String {
    "https://q.wildlifesanctuaryfca16.com/".into()
}

fn default_bot_name() -> String {
    "Slot Bot 🤖".into()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 15).unwrap()
}

fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
}

// Wednesdays we can't make, plus the mid-February block.
fn default_skip_dates() -> HashSet<NaiveDate> {
    [
        "2025-11-19",
        "2025-11-26",
        "2025-12-03",
        "2025-12-10",
        "2025-12-17",
        "2025-12-24",
        "2025-12-31",
        "2026-01-07",
        "2026-01-14",
        "2026-01-21",
        "2026-01-28",
        "2026-02-04",
        "2026-02-11",
        "2026-02-13",
        "2026-02-14",
        "2026-02-15",
    ]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect()
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36".into()
}

fn default_notified_path() -> PathBuf {
    "notified_dates.json".into()
}

fn default_summary_path() -> PathBuf {
    "available_dates.json".into()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Self>().wrap_err("failed to load config")
    }

    /// Rejects a webhook URL that was never filled in, or that points
    /// somewhere that isn't Discord, before we query anything.
    pub fn validate(&self) -> Result<()> {
        if self.discord_webhook_url == WEBHOOK_PLACEHOLDER
            || !self.discord_webhook_url.starts_with(WEBHOOK_PREFIX)
        {
            return Err(eyre!(
                "DISCORD_WEBHOOK_URL is not a Discord webhook (expected a URL starting with {WEBHOOK_PREFIX})"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            discord_webhook_url: default_webhook_url(),
            availability_url: default_availability_url(),
            booking_url: default_booking_url(),
            bot_name: default_bot_name(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            skip_dates: default_skip_dates(),
            request_delay_ms: default_request_delay_ms(),
            user_agent: default_user_agent(),
            notified_path: default_notified_path(),
            summary_path: default_summary_path(),
        }
    }

    #[test]
    fn placeholder_webhook_is_rejected() {
        assert!(base_config().validate().is_err());
    }

    #[test]
    fn non_discord_webhook_is_rejected() {
        let mut config = base_config();
        config.discord_webhook_url = "https://example.com/hook".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn real_looking_webhook_is_accepted() {
        let mut config = base_config();
        config.discord_webhook_url = "https://discord.com/api/webhooks/123/abc".into();
        assert!(config.validate().is_ok());
    }
}
