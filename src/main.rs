use std::time::Duration;

use color_eyre::Result;
use log::{error, info};

mod api;
mod checker;
mod config;
mod notify;
mod storage;

use api::AvailabilityClient;
use checker::Checker;
use config::Config;
use notify::WebhookNotifier;
use storage::NotifiedDates;

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let config = Config::from_env()?;
    config.validate()?;
    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let client = AvailabilityClient::new(config.availability_url.clone(), &config.user_agent)?;
    let notifier = WebhookNotifier::new(
        config.discord_webhook_url.clone(),
        config.bot_name.clone(),
        &config.user_agent,
    )?;

    let mut notified = NotifiedDates::load(&config.notified_path);
    info!(
        "checking {} through {} ({} skipped, {} previously notified)",
        config.start_date,
        config.end_date,
        config.skip_dates.len(),
        notified.len()
    );

    let checker = Checker {
        client: &client,
        notifier: &notifier,
        booking_url: &config.booking_url,
        request_delay: Duration::from_millis(config.request_delay_ms),
    };
    let report = checker.check_range(
        config.start_date,
        config.end_date,
        &config.skip_dates,
        &mut notified,
    );

    match report.newly_notified() {
        0 => info!("no new available dates this run"),
        n => info!("found and notified {n} new dates this run"),
    }
    let retracted = report.retractions();
    if retracted > 0 {
        info!("{retracted} previously-notified dates are full again");
    }

    // Persistence is best-effort: a failed write costs at worst a duplicate
    // notification next run.
    if let Err(err) = notified.save(&config.notified_path) {
        error!("could not save {}: {err}", config.notified_path.display());
    }
    if let Err(err) = storage::write_run_summary(
        &config.summary_path,
        config.start_date,
        config.end_date,
        &config.skip_dates,
        &report.available,
        notified.len(),
    ) {
        error!("could not write {}: {err}", config.summary_path.display());
    }

    Ok(())
}
