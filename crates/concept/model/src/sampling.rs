//! Draw helpers shared by the generators and the mixer.
//!
//! Every draw goes through an explicitly passed RNG so that a seeded run is
//! reproducible draw for draw. Site names follow the model's draw order:
//! `num_concepts_{level}`, `concept_type_{level}_{i}`,
//! `num_components_{level}_{i}`, `operation_{level}_{i}`, `concept_weights`,
//! `noise`.

use rand::Rng;
use rand_distr::{Dirichlet, Distribution, Normal, Poisson};

use crate::config::{CountSpec, MAX_COUNT};
use crate::error::{ModelError, ModelResult};

pub fn num_concepts_site(level: usize) -> String {
    format!("num_concepts_{}", level)
}

pub fn concept_type_site(level: usize, index: usize) -> String {
    format!("concept_type_{}_{}", level, index)
}

pub fn num_components_site(level: usize, index: usize) -> String {
    format!("num_components_{}_{}", level, index)
}

pub fn operation_site(level: usize, index: usize) -> String {
    format!("operation_{}_{}", level, index)
}

pub const WEIGHTS_SITE: &str = "concept_weights";
pub const NOISE_SITE: &str = "noise";

/// Turn a continuous count draw into an integer count.
///
/// Floors finite values in `[0, MAX_COUNT]`; anything else is an invalid
/// draw.
pub fn floor_count(draw: f64, site: &str) -> ModelResult<usize> {
    if !draw.is_finite() || draw < 0.0 || draw > MAX_COUNT as f64 {
        return Err(ModelError::InvalidDraw {
            site: site.to_string(),
            value: draw,
        });
    }
    Ok(draw.floor() as usize)
}

/// Draw a count according to `spec`.
pub fn sample_count<R: Rng + ?Sized>(spec: &CountSpec, site: &str, rng: &mut R) -> ModelResult<usize> {
    match spec {
        CountSpec::Fixed { value } if *value > MAX_COUNT => Err(ModelError::InvalidDraw {
            site: site.to_string(),
            value: *value as f64,
        }),
        CountSpec::Fixed { value } => Ok(*value),
        CountSpec::Poisson { rate } => {
            let poisson = Poisson::new(*rate).map_err(|e| ModelError::InvalidDistribution {
                site: site.to_string(),
                detail: e.to_string(),
            })?;
            let draw: f64 = poisson.sample(rng);
            floor_count(draw, site)
        }
    }
}

/// Uniform categorical draw over `options`.
pub fn sample_uniform<'a, T, R: Rng + ?Sized>(
    options: &'a [T],
    site: &str,
    rng: &mut R,
) -> ModelResult<&'a T> {
    if options.is_empty() {
        return Err(ModelError::InvalidDistribution {
            site: site.to_string(),
            detail: "categorical over zero options".into(),
        });
    }
    Ok(&options[rng.gen_range(0..options.len())])
}

/// Draw `n` weights from the flat Dirichlet(1, ..., 1).
///
/// The distribution needs at least two categories; one concept gets the
/// whole mass and zero concepts get an empty vector, both without drawing.
pub fn sample_simplex<R: Rng + ?Sized>(n: usize, rng: &mut R) -> ModelResult<Vec<f64>> {
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![1.0]),
        _ => {
            let dirichlet =
                Dirichlet::new_with_size(1.0, n).map_err(|e| ModelError::InvalidDistribution {
                    site: WEIGHTS_SITE.into(),
                    detail: e.to_string(),
                })?;
            Ok(dirichlet.sample(rng))
        }
    }
}

/// Draw `n` independent `Normal(0, std)` values.
pub fn sample_noise<R: Rng + ?Sized>(n: usize, std: f64, rng: &mut R) -> ModelResult<Vec<f64>> {
    let normal = Normal::new(0.0, std).map_err(|e| ModelError::InvalidDistribution {
        site: NOISE_SITE.into(),
        detail: e.to_string(),
    })?;
    Ok((0..n).map(|_| normal.sample(rng)).collect())
}
