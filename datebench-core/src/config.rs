// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML run configuration with strict validation.
//!
//! Every field is optional. Anything present is validated at load time and an
//! invalid value is a HardValidationError that prevents the run from starting.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::catalog;
use crate::error::{DateBenchError, DateBenchResult, HardValidationError};
use crate::types::{Library, OperationName};

/// Upper bound on warm-up iterations per case.
const MAX_WARMUP_ITERATIONS: u64 = 1_000_000;
/// Upper bound on measured iterations per case.
const MAX_MEASUREMENT_ITERATIONS: u64 = 10_000_000;

/// Raw harness settings as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHarnessConfig {
    #[serde(default = "default_warmup_iterations")]
    warmup_iterations: u64,
    #[serde(default = "default_measurement_iterations")]
    measurement_iterations: u64,
    #[serde(default)]
    keep_raw_samples: bool,
}

fn default_warmup_iterations() -> u64 {
    100
}

fn default_measurement_iterations() -> u64 {
    1000
}

impl Default for RawHarnessConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: default_warmup_iterations(),
            measurement_iterations: default_measurement_iterations(),
            keep_raw_samples: false,
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    libraries: Option<Vec<String>>,
    #[serde(default)]
    operations: Option<Vec<String>>,
    #[serde(default)]
    harness: RawHarnessConfig,
}

/// Validated timing-loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub warmup_iterations: u64,
    pub measurement_iterations: u64,
    pub keep_raw_samples: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: default_warmup_iterations(),
            measurement_iterations: default_measurement_iterations(),
            keep_raw_samples: false,
        }
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fixed input seed; `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Libraries allowed to register entries.
    pub libraries: BTreeSet<Library>,
    /// Operations to run; `None` runs every operation.
    pub operations: Option<BTreeSet<OperationName>>,
    pub harness: HarnessConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            libraries: Library::ALL.into_iter().collect(),
            operations: None,
            harness: HarnessConfig::default(),
        }
    }
}

impl Config {
    /// Whether the named operation is selected for this run.
    pub fn selects_operation(&self, name: &OperationName) -> bool {
        self.operations
            .as_ref()
            .map_or(true, |selected| selected.contains(name))
    }

    /// Restrict the run to `libraries`, validating every name.
    pub fn restrict_libraries<S: AsRef<str>>(&mut self, libraries: &[S]) -> DateBenchResult<()> {
        self.libraries = parse_libraries(libraries)?;
        Ok(())
    }

    /// Restrict the run to `operations`, validating every name against the catalog.
    pub fn restrict_operations<S: AsRef<str>>(&mut self, operations: &[S]) -> DateBenchResult<()> {
        self.operations = Some(parse_operations(operations)?);
        Ok(())
    }

    /// Override iteration counts, applying the same bounds as the config file.
    pub fn override_iterations(
        &mut self,
        warmup_iterations: Option<u64>,
        measurement_iterations: Option<u64>,
    ) -> DateBenchResult<()> {
        let raw = RawHarnessConfig {
            warmup_iterations: warmup_iterations.unwrap_or(self.harness.warmup_iterations),
            measurement_iterations: measurement_iterations
                .unwrap_or(self.harness.measurement_iterations),
            keep_raw_samples: self.harness.keep_raw_samples,
        };
        self.harness = ConfigLoader::validate_harness(raw)?;
        Ok(())
    }
}

fn parse_libraries<S: AsRef<str>>(names: &[S]) -> DateBenchResult<BTreeSet<Library>> {
    if names.is_empty() {
        return Err(HardValidationError::EmptySelection { field: "libraries" }.into());
    }
    names
        .iter()
        .map(|name| name.as_ref().parse::<Library>().map_err(DateBenchError::from))
        .collect()
}

fn parse_operations<S: AsRef<str>>(names: &[S]) -> DateBenchResult<BTreeSet<OperationName>> {
    if names.is_empty() {
        return Err(HardValidationError::EmptySelection { field: "operations" }.into());
    }
    names
        .iter()
        .map(|name| -> DateBenchResult<OperationName> {
            let name = name.as_ref().trim();
            if !catalog::OPERATION_NAMES.contains(&name) {
                return Err(HardValidationError::UnknownOperation {
                    name: name.to_string(),
                }
                .into());
            }
            Ok(OperationName::new(name)?)
        })
        .collect()
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> DateBenchResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DateBenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DateBenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> DateBenchResult<Config> {
        // An empty document is a valid, all-defaults config.
        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| DateBenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?
        };

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> DateBenchResult<Config> {
        let harness = Self::validate_harness(raw.harness)?;

        let libraries = match raw.libraries {
            Some(names) => parse_libraries(&names)?,
            None => Library::ALL.into_iter().collect(),
        };

        let operations = raw.operations.map(|names| parse_operations(&names)).transpose()?;

        Ok(Config {
            seed: raw.seed,
            libraries,
            operations,
            harness,
        })
    }

    fn validate_harness(raw: RawHarnessConfig) -> DateBenchResult<HarnessConfig> {
        if raw.warmup_iterations > MAX_WARMUP_ITERATIONS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "warmup_iterations",
                value: raw.warmup_iterations.to_string(),
                reason: format!("Must not exceed {}", MAX_WARMUP_ITERATIONS),
            }
            .into());
        }

        if raw.measurement_iterations == 0 || raw.measurement_iterations > MAX_MEASUREMENT_ITERATIONS
        {
            return Err(HardValidationError::InvalidFieldValue {
                field: "measurement_iterations",
                value: raw.measurement_iterations.to_string(),
                reason: format!("Must be between 1 and {}", MAX_MEASUREMENT_ITERATIONS),
            }
            .into());
        }

        Ok(HarnessConfig {
            warmup_iterations: raw.warmup_iterations,
            measurement_iterations: raw.measurement_iterations,
            keep_raw_samples: raw.keep_raw_samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_CONFIG: &str = r#"
seed: 42
libraries: [chrono, jiff, time]
operations:
  - now_utc
  - parse_utc_from_rfc_3339
harness:
  warmup_iterations: 10
  measurement_iterations: 500
  keep_raw_samples: true
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.libraries.len(), 3);
        assert!(config.libraries.contains(&Library::Jiff));
        assert!(!config.libraries.contains(&Library::Std));
        assert_eq!(config.harness.measurement_iterations, 500);
        assert!(config.harness.keep_raw_samples);

        let now_utc = OperationName::new("now_utc").unwrap();
        let shift = OperationName::new("shift_forward").unwrap();
        assert!(config.selects_operation(&now_utc));
        assert!(!config.selects_operation(&shift));
    }

    #[test]
    fn test_defaults_applied() {
        let config = ConfigLoader::load_string("").unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.libraries.len(), Library::ALL.len());
        assert!(config.operations.is_none());
        assert_eq!(config.harness, HarnessConfig::default());

        let config = ConfigLoader::load_string("seed: 7").unwrap();
        assert_eq!(config.harness.warmup_iterations, 100);
        assert_eq!(config.harness.measurement_iterations, 1000);
    }

    #[test]
    fn test_unknown_library() {
        let result = ConfigLoader::load_string("libraries: [chrono, arrow]");
        assert!(matches!(
            result,
            Err(DateBenchError::HardValidation(
                HardValidationError::UnknownLibrary { .. }
            ))
        ));
    }

    #[test]
    fn test_unknown_operation() {
        let result = ConfigLoader::load_string("operations: [now_on_mars]");
        assert!(matches!(
            result,
            Err(DateBenchError::HardValidation(
                HardValidationError::UnknownOperation { .. }
            ))
        ));
    }

    #[test]
    fn test_empty_selection() {
        assert!(ConfigLoader::load_string("libraries: []").is_err());
        assert!(ConfigLoader::load_string("operations: []").is_err());
    }

    #[test]
    fn test_zero_measurement_iterations() {
        let yaml = r#"
harness:
  measurement_iterations: 0
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConfigLoader::load_string("sede: 42");
        assert!(matches!(result, Err(DateBenchError::ConfigParse { .. })));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_CONFIG.as_bytes()).unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));

        let missing = ConfigLoader::load_file("/nonexistent/datebench.yaml");
        assert!(matches!(missing, Err(DateBenchError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_restrict_from_cli() {
        let mut config = Config::default();
        config.restrict_libraries(&["std", "humantime"]).unwrap();
        config.restrict_operations(&["format_iso_8601"]).unwrap();

        assert_eq!(config.libraries.len(), 2);
        assert!(config.selects_operation(&OperationName::new("format_iso_8601").unwrap()));
        assert!(config.restrict_operations(&["nope"]).is_err());
    }

    #[test]
    fn test_override_iterations_bounded() {
        let mut config = Config::default();
        config.override_iterations(Some(1), Some(10)).unwrap();
        assert_eq!(config.harness.warmup_iterations, 1);
        assert_eq!(config.harness.measurement_iterations, 10);

        let too_many = config.override_iterations(None, Some(10_000_001));
        assert!(matches!(
            too_many,
            Err(DateBenchError::HardValidation(
                HardValidationError::InvalidFieldValue {
                    field: "measurement_iterations",
                    ..
                }
            ))
        ));
        assert!(config.override_iterations(None, Some(0)).is_err());
        assert_eq!(config.harness.measurement_iterations, 10);
    }
}
