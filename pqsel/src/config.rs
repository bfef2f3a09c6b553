//! Tool configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! a configuration file, and environment variables.

use pqs_solver::{FormulationSettings, RankSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The main tool configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Objective construction (risk factor, budget, penalty weight)
    #[serde(default)]
    pub formulation: FormulationSettings,

    /// Enumeration limits for ranking and the reference solvers
    #[serde(default)]
    pub ranking: RankSettings,

    /// Presentation of the results
    #[serde(default)]
    pub report: ReportConfig,
}

/// How much of a ranking to report
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// The number of leading entries to include
    pub top: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { top: 16 }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `PQS_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Select three assets
    /// export PQS_FORMULATION__BUDGET=3
    ///
    /// # Weigh variance more heavily
    /// export PQS_FORMULATION__RISK_FACTOR=1.0
    ///
    /// # Allow enumerating larger markets
    /// export PQS_RANKING__MAX_ASSETS=28
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        // This maps PQS_FORMULATION__RISK_FACTOR to formulation.risk_factor
        config = config.add_source(
            config::Environment::with_prefix("PQS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.formulation, FormulationSettings::default());
        assert_eq!(config.ranking.max_assets, 24);
        assert_eq!(config.report.top, 16);
    }

    #[test]
    fn test_missing_file() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/pqsel.toml"))).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("pqsel-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[formulation]\nbudget = 2\npenalty = 4.0\n\n[report]\ntop = 4").unwrap();
        drop(file);

        let config = AppConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.formulation.budget, Some(2));
        assert_eq!(config.formulation.penalty, Some(4.0));
        assert_eq!(config.formulation.risk_factor, 0.5);
        assert_eq!(config.report.top, 4);
    }
}
