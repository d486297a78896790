//! Subdivision parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TessellateError};

/// Slack added to `1.0` before dividing by the step size, so that a step
/// like `0.1` still reaches the `u = 1` boundary under rounding.
pub const UNIFORM_EPSILON: f64 = 0.001;

/// Finest parameter lattice either tessellator may produce: `2^9 = 512`
/// cells per direction. Per patch that is at most `2 · 512²` = 524288
/// triangles, about 120 MB of samples and triangles.
pub const MAX_SUBDIVISION_LEVEL: u32 = 9;

/// Largest number of uniform steps per parameter direction.
pub const MAX_UNIFORM_STEPS: usize = 1 << MAX_SUBDIVISION_LEVEL;

/// Parameters for uniform parameter-space sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformSettings {
    /// Parameter step in both `u` and `v`.
    pub step: f64,
}

impl Default for UniformSettings {
    fn default() -> Self {
        Self { step: 0.1 }
    }
}

impl UniformSettings {
    /// Create settings with the given step size.
    pub fn new(step: f64) -> Self {
        Self { step }
    }

    /// Number of cells per direction: `floor((1 + ε) / step)`.
    pub fn steps(&self) -> usize {
        ((1.0 + UNIFORM_EPSILON) / self.step).floor() as usize
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(TessellateError::InvalidSettings(format!(
                "step size must be a positive number, got {}",
                self.step
            )));
        }
        if self.steps() > MAX_UNIFORM_STEPS {
            return Err(TessellateError::InvalidSettings(format!(
                "step size {} gives {} steps per direction (max {})",
                self.step,
                self.steps(),
                MAX_UNIFORM_STEPS
            )));
        }
        Ok(())
    }
}

/// Parameters for adaptive, error-driven subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSettings {
    /// An edge is split when the surface midpoint is at least this far
    /// from the edge's linear midpoint.
    pub error_threshold: f64,
    /// Every sample lies on the `2^-max_depth` parameter lattice. An edge
    /// whose midpoint falls off that lattice is never split.
    pub max_depth: u32,
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            error_threshold: 0.01,
            max_depth: 8,
        }
    }
}

impl AdaptiveSettings {
    /// Create settings with the given threshold and the default depth bound.
    pub fn new(error_threshold: f64) -> Self {
        Self {
            error_threshold,
            ..Self::default()
        }
    }

    /// Replace the depth bound.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of lattice cells per parameter direction, `2^max_depth`.
    pub fn lattice_scale(&self) -> f64 {
        2f64.powi(self.max_depth.min(MAX_SUBDIVISION_LEVEL) as i32)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.error_threshold.is_finite() || self.error_threshold <= 0.0 {
            return Err(TessellateError::InvalidSettings(format!(
                "error threshold must be a positive number, got {}",
                self.error_threshold
            )));
        }
        if self.max_depth > MAX_SUBDIVISION_LEVEL {
            return Err(TessellateError::InvalidSettings(format!(
                "max depth {} exceeds {}",
                self.max_depth, MAX_SUBDIVISION_LEVEL
            )));
        }
        Ok(())
    }
}

/// Which tessellator to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubdivisionMethod {
    /// Regular grid in parameter space.
    #[default]
    Uniform,
    /// Error-driven refinement.
    Adaptive,
}

impl FromStr for SubdivisionMethod {
    type Err = TessellateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "adaptive" => Ok(Self::Adaptive),
            _ => Err(TessellateError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for SubdivisionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::Adaptive => f.write_str("adaptive"),
        }
    }
}

/// A tessellator together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Subdivision {
    /// Uniform sampling.
    Uniform(UniformSettings),
    /// Adaptive refinement.
    Adaptive(AdaptiveSettings),
}

impl Subdivision {
    /// Build from a method and its single numeric parameter (step size for
    /// uniform, error threshold for adaptive).
    pub fn new(method: SubdivisionMethod, parameter: f64) -> Self {
        match method {
            SubdivisionMethod::Uniform => Self::Uniform(UniformSettings::new(parameter)),
            SubdivisionMethod::Adaptive => Self::Adaptive(AdaptiveSettings::new(parameter)),
        }
    }

    /// The method this subdivision runs.
    pub fn method(&self) -> SubdivisionMethod {
        match self {
            Self::Uniform(_) => SubdivisionMethod::Uniform,
            Self::Adaptive(_) => SubdivisionMethod::Adaptive,
        }
    }

    /// Validate the contained settings.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Uniform(settings) => settings.validate(),
            Self::Adaptive(settings) => settings.validate(),
        }
    }
}

impl Default for Subdivision {
    fn default() -> Self {
        Self::Uniform(UniformSettings::default())
    }
}
