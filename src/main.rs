mod config;
mod event;
mod predict;
mod render;
mod report;
mod track;

#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::config::Config;
use crate::event::Event;
use crate::predict::{Ephemeris, Sgp4Ephemeris, TleLoader};
use crate::render::PolarPlotRenderer;
use crate::report::format::{format_duration, format_time};

#[derive(Parser)]
#[command(name = "satpass")]
#[command(about = "Satellite pass prediction with polar plots and event reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an event config file
    Validate { config: String },
    /// List the passes in the event window without rendering
    Passes { config: String },
    /// Compute passes, render polar plots and write the reports
    Run { config: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Passes { config } => passes(&config),
        Commands::Run { config } => run(&config),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Config error: {}", e);
            None
        }
    }
}

fn load_ephemeris(config: &Config) -> Option<Sgp4Ephemeris> {
    let mut loader = TleLoader::new(config.satellite.tle_dir.clone());
    if config.satellite.reload {
        // a failed refresh falls back to whatever is already in tle_dir
        if let Err(e) = loader.fetch(&config.satellite.tle_url) {
            log::warn!("Cannot refresh TLEs: {}", e);
        }
    }
    if let Err(e) = loader.load_all() {
        eprintln!("Error loading TLEs: {}", e);
        return None;
    }
    Some(Sgp4Ephemeris::new(loader))
}

/// Builds the empty event described by `config`.
fn build_event(config: &Config, ephemeris: &dyn Ephemeris) -> Result<Event, String> {
    let satellite = ephemeris
        .satellite(&config.satellite.name)
        .map_err(|e| e.to_string())?;
    let (start, end) = config.window().map_err(|e| e.to_string())?;
    let tz = config.timezone().map_err(|e| e.to_string())?;
    let location = config.location().map_err(|e| e.to_string())?;

    Event::new(satellite, location, start, end, tz, config.downlink_mhz)
        .map_err(|e| e.to_string())
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    // from_file already validated; these only fail on a bug
    let (Ok((start, end)), Ok(tz)) = (config.window(), config.timezone()) else {
        eprintln!("Config error: inconsistent window or offset");
        return ExitCode::FAILURE;
    };

    println!("Config is valid");
    println!("  satellite: {}", config.satellite.name);
    println!("  location:  {}, {}", config.location.city, config.location.country);
    println!("  window:    {} to {}", format_time(start, &tz), format_time(end, &tz));
    println!("  samples:   {}", config.sampling.samples);
    ExitCode::SUCCESS
}

fn passes(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(ephemeris) = load_ephemeris(&config) else {
        return ExitCode::FAILURE;
    };
    let event = match build_event(&config, &ephemeris) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let intervals = match event.intervals(&ephemeris, config.sampling.horizon) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Prediction error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} passes of {} over {}",
        intervals.len(),
        event.satellite.name,
        event.location
    );
    if let Ok(epoch) = ephemeris.epoch(&event.satellite) {
        println!("  elements epoch {}", format_time(epoch, &event.tz));
    }
    for (i, interval) in intervals.iter().enumerate() {
        println!(
            "  {:>3}: {}  {}  ({})",
            i + 1,
            format_time(interval.aos, &event.tz),
            format_time(interval.los, &event.tz),
            format_duration(interval.los - interval.aos)
        );
    }
    ExitCode::SUCCESS
}

fn run(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let Some(ephemeris) = load_ephemeris(&config) else {
        return ExitCode::FAILURE;
    };
    let mut event = match build_event(&config, &ephemeris) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let renderer = PolarPlotRenderer::default();
    let settings = config.pipeline_settings();
    let summary = match event.process(&ephemeris, &renderer, &settings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Processing error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "{} intervals: {} kept, {} below {}°, {} abandoned",
        summary.intervals,
        summary.kept,
        summary.below_threshold,
        settings.min_elevation_deg,
        summary.abandoned
    );

    if let Err(e) = report::write_json(&event, &config.output.json) {
        eprintln!("Error writing JSON report: {}", e);
        return ExitCode::FAILURE;
    }
    if let Err(e) = report::write_html(&event, &config.report_options(), &config.output.html) {
        eprintln!("Error writing HTML report: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Processed {} passes", event.passes().len());
    ExitCode::SUCCESS
}
