use std::{fs, path::Path};

use super::PredictorConfig;
use crate::{PredictorError, Result};

/// Loads and validates a [`PredictorConfig`] from a JSON file. Missing fields take their defaults.
///
/// # Errors
/// Returns a `ConfigFile` error if the file cannot be read or parsed, or the validation error of
/// the parsed config.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PredictorConfig> {
    let path = path.as_ref();
    let config_err = |reason: String| PredictorError::ConfigFile {
        path: path.to_path_buf(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
    let config: PredictorConfig =
        serde_json::from_str(&content).map_err(|e| config_err(format!("invalid JSON: {e}")))?;

    config.validate()?;
    log::debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::configs::{SourceConfig, TrainingConfig};

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_object_is_the_default_config() {
        let file = write_config("{}");
        assert_eq!(load_config(file.path()).unwrap(), PredictorConfig::default());
    }

    #[test]
    fn full_config() {
        let file = write_config(
            r#"{
                "source": { "kind": "local", "path": "data/abha.csv" },
                "training": { "n_trees": 50, "seed": 7, "bootstrap": false }
            }"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Local {
                path: "data/abha.csv".into()
            }
        );
        assert_eq!(
            config.training,
            TrainingConfig {
                n_trees: 50,
                seed: 7,
                bootstrap: false,
                ..TrainingConfig::default()
            }
        );
    }

    #[test]
    fn invalid_json_is_a_config_file_error() {
        let file = write_config("{ source: ");
        assert!(matches!(
            load_config(file.path()),
            Err(PredictorError::ConfigFile { .. })
        ));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let file = write_config(r#"{ "training": { "n_trees": 0 } }"#);
        assert!(matches!(
            load_config(file.path()),
            Err(PredictorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_config("/definitely/not/here.json"),
            Err(PredictorError::ConfigFile { .. })
        ));
    }
}
