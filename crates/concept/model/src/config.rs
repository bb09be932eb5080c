//! Model configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Default number of generated levels.
pub const DEFAULT_NUM_LEVELS: usize = 3;

/// Default Poisson rate for concepts per level.
pub const DEFAULT_CONCEPT_RATE: f64 = 5.0;

/// Default Poisson rate for components per composite.
pub const DEFAULT_COMPONENT_RATE: f64 = 2.0;

/// Default standard deviation of the observation noise.
pub const DEFAULT_NOISE_STD: f64 = 0.1;

/// Default redraw budget for zero component counts.
pub const DEFAULT_MAX_RESAMPLE_ATTEMPTS: usize = 16;

/// Largest count a single draw may produce (concepts per level, or
/// components per concept).
pub const MAX_COUNT: usize = 100_000;

/// How a count is drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CountSpec {
    /// Poisson draw, floored to an integer.
    Poisson { rate: f64 },
    /// Always the same count; consumes no randomness.
    Fixed { value: usize },
}

impl CountSpec {
    pub fn poisson(rate: f64) -> Self {
        Self::Poisson { rate }
    }

    pub fn fixed(value: usize) -> Self {
        Self::Fixed { value }
    }

    fn validate(&self, what: &str) -> ModelResult<()> {
        match self {
            CountSpec::Poisson { rate } if !rate.is_finite() || *rate <= 0.0 => Err(
                ModelError::InvalidConfig(format!("{} rate must be positive, got {}", what, rate)),
            ),
            CountSpec::Poisson { rate } if *rate > MAX_COUNT as f64 => Err(ModelError::InvalidConfig(
                format!("{} rate {} exceeds the limit of {}", what, rate, MAX_COUNT),
            )),
            CountSpec::Fixed { value } if *value > MAX_COUNT => Err(ModelError::InvalidConfig(
                format!("{} {} exceeds the limit of {}", what, value, MAX_COUNT),
            )),
            _ => Ok(()),
        }
    }
}

/// What the composer does when a composite draws zero components.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZeroComponentPolicy {
    /// Fail immediately with a degenerate-structure error.
    Reject,
    /// Redraw the component count up to `max_attempts` times, then fail.
    Resample { max_attempts: usize },
}

impl Default for ZeroComponentPolicy {
    fn default() -> Self {
        Self::Resample {
            max_attempts: DEFAULT_MAX_RESAMPLE_ATTEMPTS,
        }
    }
}

/// Configuration for a generative run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of levels to generate (level 0 through `num_levels - 1`).
    pub num_levels: usize,
    /// Concepts drawn per level.
    pub concept_count: CountSpec,
    /// Components drawn per composite concept.
    pub component_count: CountSpec,
    /// Standard deviation of the isotropic observation noise.
    pub noise_std: f64,
    /// Handling of composites that draw zero components.
    pub zero_component_policy: ZeroComponentPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            num_levels: DEFAULT_NUM_LEVELS,
            concept_count: CountSpec::poisson(DEFAULT_CONCEPT_RATE),
            component_count: CountSpec::poisson(DEFAULT_COMPONENT_RATE),
            noise_std: DEFAULT_NOISE_STD,
            zero_component_policy: ZeroComponentPolicy::default(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> ModelResult<()> {
        self.concept_count.validate("concept count")?;
        self.component_count.validate("component count")?;
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ModelError::InvalidConfig(format!(
                "noise_std must be finite and non-negative, got {}",
                self.noise_std
            )));
        }
        if let ZeroComponentPolicy::Resample { max_attempts: 0 } = self.zero_component_policy {
            return Err(ModelError::InvalidConfig(
                "resample policy needs at least one attempt".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_model_constants() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.num_levels, 3);
        assert_eq!(cfg.concept_count, CountSpec::poisson(5.0));
        assert_eq!(cfg.component_count, CountSpec::poisson(2.0));
        assert!((cfg.noise_std - 0.1).abs() < f64::EPSILON);
        assert_eq!(
            cfg.zero_component_policy,
            ZeroComponentPolicy::Resample { max_attempts: 16 }
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_rates_and_noise() {
        let cfg = ModelConfig {
            concept_count: CountSpec::poisson(0.0),
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ModelConfig {
            component_count: CountSpec::poisson(f64::NAN),
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ModelConfig {
            noise_std: -0.1,
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ModelConfig {
            zero_component_policy: ZeroComponentPolicy::Resample { max_attempts: 0 },
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn counts_are_bounded() {
        let cfg = ModelConfig {
            component_count: CountSpec::fixed(0),
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = ModelConfig {
            concept_count: CountSpec::fixed(usize::MAX),
            ..ModelConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ModelError::InvalidConfig(_))));

        let cfg = ModelConfig {
            component_count: CountSpec::poisson(1e300),
            ..ModelConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ModelError::InvalidConfig(_))));

        let cfg = ModelConfig {
            concept_count: CountSpec::fixed(MAX_COUNT),
            ..ModelConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: ModelConfig = serde_json::from_str(
            r#"{"num_levels": 2, "component_count": {"type": "fixed", "value": 3}}"#,
        )
        .unwrap();
        assert_eq!(cfg.num_levels, 2);
        assert_eq!(cfg.component_count, CountSpec::fixed(3));
        assert_eq!(cfg.concept_count, CountSpec::poisson(5.0));
    }
}
