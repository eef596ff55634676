use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{self, AppConfig, Overrides, ScenarioConfig};
use crate::error::ConfigError;
use crate::io::ExportFormat;
use crate::sim::simulation::{RunSummary, Simulation};

/// Inputs of the `simulation` command.
#[derive(Debug, Clone)]
pub struct SimulationArgs {
    pub config: PathBuf,
    pub scenario: PathBuf,
    pub output: PathBuf,
    pub magnetic_field: bool,
    pub overrides: Overrides,
}

/// Checks that `path` names a JSON file using only `[A-Za-z0-9_/.-]`.
pub fn scenario_path(path: &str) -> Result<PathBuf, ConfigError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '.' | '-');
    let stem = path.strip_suffix(".json").unwrap_or_default();
    if stem.is_empty() || !path.chars().all(allowed) {
        return Err(ConfigError::invalid(
            "scenario",
            format!("expected a path to a .json scenario file, got `{}`", path),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Loads both configs, validates everything and runs the simulation.
pub fn run(args: &SimulationArgs) -> Result<RunSummary> {
    let mut app: AppConfig = config::load(&args.config)?;
    app.apply(&args.overrides);
    app.validate()?;
    let scenario = ScenarioConfig::load(&args.scenario)?;
    ExportFormat::from_path(&args.output)?;

    tracing::debug!(config = %args.config.display(), scenario = %args.scenario.display(), "Configuration loaded");
    Simulation::new(app, scenario, &args.output, args.magnetic_field).run()
}

/// Directory where auxiliary outputs next to `output` are written.
pub fn output_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_path() {
        assert!(scenario_path("scenarios/mars.json").is_ok());
        assert!(scenario_path("./config/scenario_test-2.json").is_ok());
        assert!(scenario_path("mars.yaml").is_err());
        assert!(scenario_path(".json").is_err());
        assert!(scenario_path("my scenario.json").is_err());
        assert!(scenario_path("").is_err());
    }

    #[test]
    fn test_output_dir() {
        assert_eq!(output_dir(Path::new("data.csv")), PathBuf::from("."));
        assert_eq!(output_dir(Path::new("out/data.csv")), PathBuf::from("out"));
    }
}
