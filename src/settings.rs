//! Spin settings and per-spin overrides
//!
//! Loaded from the host's JSON configuration; every field is optional and
//! falls back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Engine-wide spin settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinSettings {
    /// Minimum whole turns per spin (inclusive)
    pub min_spins: u32,
    /// Maximum whole turns per spin (exclusive unless equal to `min_spins`)
    pub max_spins: u32,
    /// Animation length in milliseconds
    pub duration_ms: f64,
    /// Landing offset as a fraction of the wedge span, each side of center
    pub jitter_fraction: f64,
    /// RNG seed; `None` lets the host pick one
    pub seed: Option<u64>,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self {
            min_spins: DEFAULT_MIN_SPINS,
            max_spins: DEFAULT_MAX_SPINS,
            duration_ms: DEFAULT_DURATION_MS,
            jitter_fraction: DEFAULT_JITTER_FRACTION,
            seed: None,
        }
    }
}

impl SpinSettings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_spins > self.max_spins {
            return Err(SettingsError::Invalid(format!(
                "minSpins ({}) exceeds maxSpins ({})",
                self.min_spins, self.max_spins
            )));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(SettingsError::Invalid(format!(
                "durationMs must be a non-negative number, got {}",
                self.duration_ms
            )));
        }
        if !(0.0..MAX_JITTER_FRACTION).contains(&self.jitter_fraction) {
            return Err(SettingsError::Invalid(format!(
                "jitterFraction must be in [0, {MAX_JITTER_FRACTION}), got {}",
                self.jitter_fraction
            )));
        }
        Ok(())
    }

    /// Jitter fraction forced into the safe range (unvalidated settings fall back)
    pub fn effective_jitter(&self) -> f64 {
        match self.jitter_fraction {
            j if (0.0..MAX_JITTER_FRACTION).contains(&j) => j,
            j if j >= MAX_JITTER_FRACTION => DEFAULT_JITTER_FRACTION,
            _ => 0.0,
        }
    }
}

/// Overrides for a single spin request
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpinOptions {
    pub min_spins: Option<u32>,
    pub max_spins: Option<u32>,
    pub duration_ms: Option<f64>,
}

/// Fully resolved parameters for one spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSpin {
    pub min_spins: u32,
    pub max_spins: u32,
    pub duration_ms: f64,
    pub jitter_fraction: f64,
}

impl SpinOptions {
    pub fn with_spins(min: u32, max: u32) -> Self {
        Self {
            min_spins: Some(min),
            max_spins: Some(max),
            ..Default::default()
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Fill unset fields from `settings`
    ///
    /// A max below min collapses to a fixed turn count, and a negative or
    /// non-finite duration falls back to an instant spin.
    pub fn resolve(&self, settings: &SpinSettings) -> ResolvedSpin {
        let min_spins = self.min_spins.unwrap_or(settings.min_spins);
        let max_spins = self.max_spins.unwrap_or(settings.max_spins).max(min_spins);
        let duration_ms = self.duration_ms.unwrap_or(settings.duration_ms);
        let duration_ms = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };

        ResolvedSpin {
            min_spins,
            max_spins,
            duration_ms,
            jitter_fraction: settings.effective_jitter(),
        }
    }
}
