//! Seizure detection over recorded landmark streams.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use seizure_guard::{
    cli::Args,
    config::{Config, EXAMPLE_CONFIG},
    engine::Engine,
    event_log::EventType,
    landmarks::ReplayLandmarks,
};
use std::time::{Duration, Instant};

/// Time allowed for in-flight alert notifications before exiting
const DISPATCH_GRACE: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Seizure Guard - motion monitor");

    // A given configuration must load; defaults only apply without --config
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path.display());
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        Config::default()
    };

    let Some(replay_path) = &args.replay else {
        bail!("No landmark source given; pass --replay <file>");
    };
    let mut provider = ReplayLandmarks::from_file(replay_path)
        .with_context(|| format!("Failed to load replay {}", replay_path.display()))?;

    let mut engine = Engine::from_config(&config).context("Failed to start detection engine")?;
    if let Some(contact) = &args.contact {
        engine.set_contact(contact);
    }

    let frames = engine.run(&mut provider)?;
    wait_for_dispatches(&mut engine);

    let status = engine.status();
    info!(
        "Processed {} frames, final state {:?}, {} log entries",
        frames,
        status.alert_state,
        engine.log().len()
    );

    let report_path = args.report.unwrap_or_else(|| config.session.report_file.clone());
    std::fs::write(&report_path, engine.log().to_csv())
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    info!("Report written to {}", report_path.display());

    Ok(())
}

/// Give background notifications a bounded chance to report their outcome
fn wait_for_dispatches(engine: &mut Engine) {
    let started = count_events(engine, |event: EventType| event == EventType::SeizureDetected);
    let is_outcome = |event: EventType| {
        matches!(
            event,
            EventType::AlertSent | EventType::AlertSkipped | EventType::AlertFailed
        )
    };

    let deadline = Instant::now() + DISPATCH_GRACE;
    while count_events(engine, is_outcome) < started && Instant::now() < deadline {
        engine.collect_dispatch_reports();
        std::thread::sleep(Duration::from_millis(50));
    }
    if count_events(engine, is_outcome) < started {
        warn!("Some alert notifications did not finish before exit");
    }
}

fn count_events(engine: &Engine, wanted: impl Fn(EventType) -> bool) -> usize {
    engine.log().entries().iter().filter(|e| wanted(e.event_type)).count()
}
