use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::info;

use scintfiber::logging::init_tracing;
use scintfiber::{Model, RunCommand, RunScript, Settings};

fn run(script_path: Option<PathBuf>) -> Result<()> {
    let mut settings = Settings::default();
    let script = match &script_path {
        Some(path) => RunScript::from_file(path)
            .with_context(|| format!("failed to read run script {}", path.display()))?,
        None => {
            info!(events = settings.events, "No run script given, using defaults");
            RunScript::default_run(&settings)
        }
    };

    let mut model = Model::new(settings.clone()).context("failed to set up the detector model")?;
    for command in &script.commands {
        match command {
            RunCommand::BeamOn(n) => {
                let summary = model
                    .beam_on(*n)
                    .with_context(|| format!("run of {} events failed", n))?;
                match summary {
                    Some(summary) => println!(
                        "Run {}: {} events, {:.3} photons/event, {:.4} MeV/event -> {}",
                        summary.run_id,
                        summary.events,
                        summary.mean_photons_per_event,
                        summary.mean_energy_deposit_per_event,
                        model.settings.output_path.display()
                    ),
                    None => info!("Run had no events, nothing written"),
                }
            }
            other => {
                other.apply(&mut settings);
                model
                    .update_settings(settings.clone())
                    .with_context(|| format!("cannot apply {:?}", other))?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let script_path = std::env::args_os().nth(1).map(PathBuf::from);
    match run(script_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
