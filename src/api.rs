use chrono::NaiveDate;
use color_eyre::Result;
use reqwest::blocking::Client;
use serde::Deserialize;

/// One date's worth of booking data, as the API reports it.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotData {
    #[serde(default)]
    pub available: u32,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub used: u32,
}

#[derive(Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    success: bool,
    data: Option<SlotData>,
}

pub struct AvailabilityClient {
    client: Client,
    endpoint: String,
}

impl AvailabilityClient {
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Queries the booking API for a single date. `Ok(None)` means the API
    /// answered but had nothing usable for that date; `Err` means the request
    /// or the payload itself failed.
    pub fn fetch(&self, date: NaiveDate) -> Result<Option<SlotData>> {
        let response: AvailabilityResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()?
            .error_for_status()?
            .json()?;

        match response {
            AvailabilityResponse {
                success: true,
                data: Some(slot),
            } => Ok(Some(slot)),
            _ => Ok(None),
        }
    }
}
