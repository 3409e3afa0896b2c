use chrono::NaiveDate;
use color_eyre::Result;
use log::{error, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;

use crate::api::SlotData;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    username: &'a str,
}

pub struct WebhookNotifier {
    client: Client,
    url: String,
    username: String,
}

impl WebhookNotifier {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.into(),
            username: username.into(),
        })
    }

    /// Delivers one message. Failures are logged and swallowed: a dead
    /// webhook must not stop the availability scan.
    pub fn send(&self, content: &str) {
        match self.try_send(content) {
            Ok(()) => info!("webhook message delivered"),
            Err(err) => {
                error!("webhook delivery failed: {err}");
                if err.status() == Some(StatusCode::NOT_FOUND) {
                    error!("hint: the webhook URL may be wrong or the webhook was deleted");
                }
            }
        }
    }

    fn try_send(&self, content: &str) -> reqwest::Result<()> {
        self.client
            .post(&self.url)
            .json(&WebhookPayload {
                content,
                username: &self.username,
            })
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

pub fn new_slot_message(date: NaiveDate, slot: &SlotData, booking_url: &str) -> String {
    format!(
        "## 🚨 New slot found! 🚨\n\
         > **Date: {date}**\n\
         > **Available: {} / {}**\n\n\
         Go book it! {booking_url}",
        slot.available, slot.capacity
    )
}
