//! Run-control scripts.
//!
//! A script is a list of slash commands, one per line, in the style of a
//! Geant4 macro:
//!
//! ```text
//! # beta source, 1000 events
//! /gun/mode beta
//! /random/setSeeds 12345
//! /analysis/setFileName out/beta.json
//! /run/beamOn 1000
//! ```
//!
//! Setting commands change [`Settings`] for every later `/run/beamOn`.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, SimError};
use crate::settings::Settings;
use crate::source::SourceMode;

/// Command prefixes accepted and skipped: visualisation, verbosity and setup
const IGNORED_PREFIXES: &[&str] = &["/control/", "/vis/", "/tracking/"];

#[derive(Debug, Clone, PartialEq)]
pub enum RunCommand {
    BeamOn(u64),
    SourceMode(SourceMode),
    AimAtCenter(bool),
    Seed(u64),
    OutputFile(PathBuf),
    LightCapture(f64),
    TrappingEfficiency(f64),
}

impl RunCommand {
    /// Update `settings`; `BeamOn` leaves them untouched.
    pub fn apply(&self, settings: &mut Settings) {
        match self {
            RunCommand::BeamOn(_) => {}
            RunCommand::SourceMode(mode) => settings.mode = *mode,
            RunCommand::AimAtCenter(aim) => settings.aim_at_center = *aim,
            RunCommand::Seed(seed) => settings.seed = *seed,
            RunCommand::OutputFile(path) => settings.output_path = path.clone(),
            RunCommand::LightCapture(p) => settings.optics.light_capture = *p,
            RunCommand::TrappingEfficiency(p) => settings.optics.trapping_efficiency = *p,
        }
    }
}

fn single_arg<'a>(line: usize, command: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(SimError::script(
            line,
            format!("'{}' takes exactly one argument, got {}", command, args.len()),
        )),
    }
}

fn parse_value<T: FromStr>(line: usize, command: &str, args: &[&str]) -> Result<T> {
    let arg = single_arg(line, command, args)?;
    arg.parse()
        .map_err(|_| SimError::script(line, format!("'{}': invalid value '{}'", command, arg)))
}

fn parse_probability(line: usize, command: &str, args: &[&str]) -> Result<f64> {
    let p: f64 = parse_value(line, command, args)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(SimError::script(
            line,
            format!("'{}': probability {} outside [0, 1]", command, p),
        ));
    }
    Ok(p)
}

fn parse_bool(line: usize, command: &str, args: &[&str]) -> Result<bool> {
    match single_arg(line, command, args)?.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        other => Err(SimError::script(
            line,
            format!("'{}': expected true or false, got '{}'", command, other),
        )),
    }
}

/// Parse one non-empty, comment-free line. `None` for accepted no-ops.
fn parse_line(line: usize, text: &str) -> Result<Option<RunCommand>> {
    let mut parts = text.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = parts.collect();

    let parsed = match command {
        "/run/beamOn" => RunCommand::BeamOn(parse_value(line, command, &args)?),
        "/gun/mode" => {
            let arg = single_arg(line, command, &args)?;
            RunCommand::SourceMode(arg.parse().map_err(|e| SimError::script(line, e))?)
        }
        "/gun/aimCenter" => RunCommand::AimAtCenter(parse_bool(line, command, &args)?),
        "/random/setSeeds" => {
            // only the first seed matters for a single stream engine
            let first = args.first().copied().unwrap_or_default();
            RunCommand::Seed(parse_value(line, command, &[first])?)
        }
        "/analysis/setFileName" => {
            RunCommand::OutputFile(PathBuf::from(single_arg(line, command, &args)?))
        }
        "/optics/lightCapture" => {
            RunCommand::LightCapture(parse_probability(line, command, &args)?)
        }
        "/optics/trappingEfficiency" => {
            RunCommand::TrappingEfficiency(parse_probability(line, command, &args)?)
        }
        "/run/initialize" => return Ok(None),
        c if IGNORED_PREFIXES.iter().any(|p| c.starts_with(p)) => {
            debug!(line, command = c, "ignoring command");
            return Ok(None);
        }
        other => {
            return Err(SimError::script(line, format!("unknown command '{}'", other)));
        }
    };
    Ok(Some(parsed))
}

/// Parse a whole script; line numbers in errors start at 1.
pub fn parse_script(text: &str) -> Result<Vec<RunCommand>> {
    let mut commands = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        if let Some(command) = parse_line(i + 1, content)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// A parsed script and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RunScript {
    pub path: Option<PathBuf>,
    pub commands: Vec<RunCommand>,
}

impl RunScript {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            commands: parse_script(&text)?,
        })
    }

    /// Script running `settings.events` events with no changes.
    pub fn default_run(settings: &Settings) -> Self {
        Self {
            path: None,
            commands: vec![RunCommand::BeamOn(settings.events)],
        }
    }

    pub fn beam_on_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, RunCommand::BeamOn(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_script() {
        let script = "\
# comment line
/control/verbose 2
/run/initialize

/gun/mode beta       # trailing comment
/gun/aimCenter false
/random/setSeeds 99 100
/analysis/setFileName out/run.json
/optics/lightCapture 0.2
/optics/trappingEfficiency 0.05
/vis/open OGL
/run/beamOn 500
";
        let commands = parse_script(script).unwrap();
        assert_eq!(
            commands,
            vec![
                RunCommand::SourceMode(SourceMode::BetaSource),
                RunCommand::AimAtCenter(false),
                RunCommand::Seed(99),
                RunCommand::OutputFile(PathBuf::from("out/run.json")),
                RunCommand::LightCapture(0.2),
                RunCommand::TrappingEfficiency(0.05),
                RunCommand::BeamOn(500),
            ]
        );
    }

    #[test]
    fn test_unknown_command_reports_line() {
        let err = parse_script("/run/beamOn 1\n\n/gun/particle e-\n").unwrap_err();
        match err {
            SimError::Script { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("/gun/particle"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_malformed_values() {
        assert!(parse_script("/run/beamOn many").is_err());
        assert!(parse_script("/run/beamOn -5").is_err());
        assert!(parse_script("/run/beamOn").is_err());
        assert!(parse_script("/gun/mode neutron").is_err());
        assert!(parse_script("/gun/aimCenter maybe").is_err());
        assert!(parse_script("/optics/lightCapture 1.5").is_err());
        assert!(parse_script("/random/setSeeds").is_err());
    }

    #[test]
    fn test_apply_updates_settings() {
        let mut settings = Settings::default();
        for command in parse_script("/gun/mode beta\n/random/setSeeds 5\n/optics/lightCapture 0.3")
            .unwrap()
        {
            command.apply(&mut settings);
        }
        assert_eq!(settings.mode, SourceMode::BetaSource);
        assert_eq!(settings.seed, 5);
        assert_eq!(settings.optics.light_capture, 0.3);

        RunCommand::BeamOn(10).apply(&mut settings);
        assert_eq!(settings.seed, 5);
    }

    #[test]
    fn test_default_run() {
        let settings = Settings::default();
        let script = RunScript::default_run(&settings);
        assert_eq!(script.commands, vec![RunCommand::BeamOn(100)]);
        assert_eq!(script.beam_on_count(), 1);
        assert!(script.path.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RunScript::from_file(Path::new("/nonexistent/run.mac")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
