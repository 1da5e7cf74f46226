//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the builder-input for a [`Simulation`](crate::Simulation).
//! [`validate()`](SimConfig::validate) runs once when the simulation is
//! constructed; an invalid config never reaches the stepping loop.

use std::error::Error;
use std::fmt;

// ── SimConfig ──────────────────────────────────────────────────────

/// Time-stepping configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Recorded step width in simulated time units. Default: 1.0.
    pub dt: f64,
    /// Upper bound on the internal integration step, at most `dt`.
    /// `None` integrates each recorded step in one piece.
    pub internal_dt: Option<f64>,
    /// Whether `advance` appends rows to the history. Default: true.
    pub record_history: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0,
            internal_dt: None,
            record_history: true,
        }
    }
}

impl SimConfig {
    /// Config with a step width chosen for a run of `runtime` units.
    ///
    /// `dt = 10^(floor(log10(runtime)) - 2)`, doubled when that would
    /// record more than 500 rows.
    pub fn for_runtime(runtime: f64) -> Result<Self, ConfigError> {
        if !(runtime.is_finite() && runtime > 0.0) {
            return Err(ConfigError::InvalidRuntime { value: runtime });
        }
        let mut dt = 10f64.powi(runtime.log10().floor() as i32 - 2);
        if runtime / dt > 500.0 {
            dt *= 2.0;
        }
        Ok(Self {
            dt,
            ..Self::default()
        })
    }

    /// Set the internal integration step.
    pub fn with_internal_dt(mut self, internal_dt: f64) -> Self {
        self.internal_dt = Some(internal_dt);
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidDt { value: self.dt });
        }
        if let Some(h) = self.internal_dt {
            if !(h.is_finite() && h > 0.0 && h <= self.dt) {
                return Err(ConfigError::InvalidInternalDt {
                    value: h,
                    dt: self.dt,
                });
            }
        }
        Ok(())
    }

    /// Number of internal sub-steps per recorded step.
    ///
    /// `ceil(dt / internal_dt)`, at least 1.
    pub fn substeps(&self) -> u64 {
        match self.internal_dt {
            Some(h) if h < self.dt => (self.dt / h).ceil() as u64,
            _ => 1,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`SimConfig::validate`] and [`SimConfig::for_runtime`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `dt` is zero, negative, or not finite.
    InvalidDt {
        /// The offending value.
        value: f64,
    },
    /// `internal_dt` is zero, negative, not finite, or larger than `dt`.
    InvalidInternalDt {
        /// The offending value.
        value: f64,
        /// The configured recorded step.
        dt: f64,
    },
    /// A run length is zero, negative, or not finite.
    InvalidRuntime {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDt { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidInternalDt { value, dt } => {
                write!(
                    f,
                    "internal_dt must be finite, positive and at most dt = {dt}, got {value}"
                )
            }
            Self::InvalidRuntime { value } => {
                write!(f, "runtime must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dt_rejected() {
        let cfg = SimConfig {
            dt: 0.0,
            ..SimConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidDt { value }) => assert_eq!(value, 0.0),
            other => panic!("expected InvalidDt, got {other:?}"),
        }
    }

    #[test]
    fn nan_internal_dt_rejected() {
        let cfg = SimConfig::default().with_internal_dt(f64::NAN);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidInternalDt { .. })
        ));
    }

    #[test]
    fn internal_dt_above_dt_rejected() {
        let cfg = SimConfig::default().with_internal_dt(2.0);
        match cfg.validate() {
            Err(ConfigError::InvalidInternalDt { value, dt }) => {
                assert_eq!(value, 2.0);
                assert_eq!(dt, 1.0);
            }
            other => panic!("expected InvalidInternalDt, got {other:?}"),
        }
    }

    #[test]
    fn for_runtime_picks_decade_step() {
        assert_eq!(SimConfig::for_runtime(100.0).unwrap().dt, 1.0);
        assert_eq!(SimConfig::for_runtime(300.0).unwrap().dt, 1.0);
        assert!((SimConfig::for_runtime(5.0).unwrap().dt - 0.01).abs() < 1e-15);
    }

    #[test]
    fn for_runtime_doubles_when_too_many_rows() {
        assert_eq!(SimConfig::for_runtime(600.0).unwrap().dt, 2.0);
        assert_eq!(SimConfig::for_runtime(999.0).unwrap().dt, 2.0);
    }

    #[test]
    fn for_runtime_rejects_nonpositive() {
        assert!(matches!(
            SimConfig::for_runtime(0.0),
            Err(ConfigError::InvalidRuntime { .. })
        ));
        assert!(SimConfig::for_runtime(f64::INFINITY).is_err());
    }

    #[test]
    fn substeps_round_up() {
        let cfg = SimConfig::default().with_internal_dt(0.3);
        assert_eq!(cfg.substeps(), 4);
        assert_eq!(SimConfig::default().substeps(), 1);
        assert_eq!(SimConfig::default().with_internal_dt(1.0).substeps(), 1);
    }
}
