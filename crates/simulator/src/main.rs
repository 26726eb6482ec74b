//! F1 Telemetry Simulator - Main Entry Point

use anyhow::Context;
use clap::Parser;
use simulator::{init_logging, Cli, SimError, Simulation, SimulatorConfig};
use std::io;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use telemetry_ui::ConsoleRenderer;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<SimError>().map_or(1, SimError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = SimulatorConfig::load(cli)?;
    init_logging(config.level().map_err(SimError::from)?, config.log_json)?;

    info!("=== F1 Telemetry Simulator v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Seed {}, {} laps, {} drivers, {} transport, {:.0} Hz{}",
        config.seed,
        config.laps,
        config.drivers,
        config.transport.as_str(),
        config.rate_hz,
        if config.paced { "" } else { " (unpaced)" }
    );

    let simulation = Simulation::new(config.clone())?;

    let handle = simulation.shutdown_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping the race...");
        handle.shutdown();
    })
    .context("Failed to install Ctrl+C handler")?;

    if config.start_delay_ms > 0 {
        info!("Starting in {} ms", config.start_delay_ms);
        thread::sleep(Duration::from_millis(config.start_delay_ms));
    }

    let summary = if cli.json {
        // Keep stdout for the JSON document
        let renderer = ConsoleRenderer::new(io::stderr(), config.laps).with_color(config.color);
        simulation.run_with(renderer)?
    } else {
        simulation.run()?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let state = if summary.finished() {
            "complete"
        } else {
            "interrupted"
        };
        println!(
            "\nRace {} after {:.1}s of racing ({} ticks).",
            state, summary.race_time_secs, summary.ticks
        );
        println!(
            "Seed used: {} (use this seed to replay the exact race)",
            summary.seed
        );
    }
    Ok(())
}
