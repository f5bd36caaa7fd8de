use std::fs;

use scintfiber::{Model, RunCommand, RunScript, RunSummary, Settings, SourceMode};

#[test]
fn test_histogram_file_written_with_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("sipm_output.json");
    let settings = Settings {
        output_path: path.clone(),
        ..Settings::default()
    };

    let summary = Model::new(settings).unwrap().beam_on(20).unwrap().unwrap();
    assert!(path.exists());

    let from_disk = RunSummary::read_from(&path).unwrap();
    assert_eq!(from_disk, summary);
    assert_eq!(from_disk.h_npe.name, "hNpe");
    assert_eq!(from_disk.h_npe.n_bins(), 80);
    assert_eq!(from_disk.h_wavelength.name, "hWavelength");
    assert_eq!(from_disk.h_wavelength.n_bins(), 120);
    assert_eq!(from_disk.h_wavelength.low, 300.0);
    assert_eq!(from_disk.h_wavelength.high, 900.0);
}

#[test]
fn test_zero_events_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.json");
    let settings = Settings {
        output_path: path.clone(),
        ..Settings::default()
    };
    assert!(Model::new(settings).unwrap().beam_on(0).unwrap().is_none());
    assert!(!path.exists());
}

#[test]
fn test_each_run_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let settings = Settings {
        output_path: path.clone(),
        ..Settings::default()
    };
    let mut model = Model::new(settings).unwrap();
    model.beam_on(10).unwrap();
    let second = model.beam_on(5).unwrap().unwrap();
    assert_eq!(RunSummary::read_from(&path).unwrap().events, 5);
    assert_eq!(second.run_id, 1);
}

#[test]
fn test_script_drives_runs() {
    let dir = tempfile::tempdir().unwrap();
    let cosmic_out = dir.path().join("cosmic.json");
    let beta_out = dir.path().join("beta").join("run.json");
    let script_path = dir.path().join("run.mac");
    fs::write(
        &script_path,
        format!(
            "/run/initialize\n\
             /analysis/setFileName {}\n\
             /run/beamOn 10\n\
             # switch to the collimated source\n\
             /gun/mode beta\n\
             /gun/aimCenter false\n\
             /random/setSeeds 3\n\
             /analysis/setFileName {}\n\
             /run/beamOn 15\n",
            cosmic_out.display(),
            beta_out.display()
        ),
    )
    .unwrap();

    let script = RunScript::from_file(&script_path).unwrap();
    assert_eq!(script.beam_on_count(), 2);

    let mut settings = Settings::default();
    let mut model = Model::new(settings.clone()).unwrap();
    let mut summaries = Vec::new();
    for command in &script.commands {
        match command {
            RunCommand::BeamOn(n) => summaries.push(model.beam_on(*n).unwrap().unwrap()),
            other => {
                other.apply(&mut settings);
                model.update_settings(settings.clone()).unwrap();
            }
        }
    }

    assert_eq!(model.settings.mode, SourceMode::BetaSource);
    assert_eq!(RunSummary::read_from(&cosmic_out).unwrap().events, 10);
    assert_eq!(RunSummary::read_from(&beta_out).unwrap().events, 15);
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.total_energy_deposit > 0.0));
}
