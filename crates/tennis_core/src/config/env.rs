use super::SimConfig;
use crate::error::{Result, SimError};
use std::path::Path;
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "TENNIS_SIM_CONFIG_PATH";

/// Load a validated config from the JSON file named by `TENNIS_SIM_CONFIG_PATH`.
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn from_env() -> Result<Option<SimConfig>> {
    let Ok(path) = env::var(CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    from_file(path).map(Some)
}

/// Load and validate a JSON config file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SimConfig> {
    let path = path.as_ref().display().to_string();
    let content = fs::read_to_string(&path)
        .map_err(|e| SimError::config(format!("Failed to read config from '{path}': {e}")))?;

    let config = SimConfig::from_json(&content).map_err(|e| {
        SimError::config(format!("Failed to parse config JSON from '{path}': {e}"))
    })?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_reads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"root_id": "A", "rules": {{"sets_to_win": 3}}}}"#).unwrap();

        let config = from_file(file.path()).unwrap();
        assert_eq!(config.root_id, "A");
        assert_eq!(config.rules.sets_to_win, 3);
        assert_eq!(config.rules.games_to_win_set, 6);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"probability_override": -0.1}}"#).unwrap();

        assert!(matches!(from_file(file.path()), Err(SimError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }
}
