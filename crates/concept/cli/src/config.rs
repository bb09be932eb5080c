//! Experiment configuration file.
//!
//! One YAML (or JSON) document with a section per stage. Every section and
//! field is optional; missing values take the library defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use concept_inference::SamplerConfig;
use concept_model::ModelConfig;
use concept_structure::StructureConfig;
use concept_symbolic::{OracleConfig, DEFAULT_MAX_THEOREM_TERMS};

use crate::error::{CliError, CliResult};

/// Default number of random theorems checked per run.
pub const DEFAULT_THEOREM_COUNT: usize = 5;

/// Default input grid when no data file is given.
pub const DEFAULT_INPUT_START: f64 = -1.0;
pub const DEFAULT_INPUT_END: f64 = 1.0;
pub const DEFAULT_INPUT_POINTS: usize = 100;

/// Random theorem settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TheoremSettings {
    pub count: usize,
    pub max_terms: usize,
}

impl Default for TheoremSettings {
    fn default() -> Self {
        Self {
            count: DEFAULT_THEOREM_COUNT,
            max_terms: DEFAULT_MAX_THEOREM_TERMS,
        }
    }
}

/// Evenly spaced input used when no data file is given.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputGrid {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for InputGrid {
    fn default() -> Self {
        Self {
            start: DEFAULT_INPUT_START,
            end: DEFAULT_INPUT_END,
            points: DEFAULT_INPUT_POINTS,
        }
    }
}

/// Full experiment configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub model: ModelConfig,
    pub structure: StructureConfig,
    pub sampler: SamplerConfig,
    pub oracle: OracleConfig,
    pub theorems: TheoremSettings,
    pub input: InputGrid,
}

impl ExperimentConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        debug!(path = %path.display(), "experiment config loaded");
        Ok(config)
    }

    /// Overlay command-line overrides.
    pub fn with_levels(mut self, levels: Option<usize>) -> Self {
        if let Some(levels) = levels {
            self.model.num_levels = levels;
        }
        self
    }

    pub fn validate(&self) -> CliResult<()> {
        self.model.validate()?;
        self.structure.validate()?;
        self.sampler.validate()?;
        self.oracle.validate()?;
        if self.input.points == 0 {
            return Err(CliError::InvalidArgument(
                "input grid needs at least one point".into(),
            ));
        }
        Ok(())
    }
}
