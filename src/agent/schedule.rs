//! Per-trial decay schedules for the exploration and learning rates

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the exploration and learning rates shrink between training trials.
///
/// Any bounded, monotonically decreasing schedule is acceptable as long as it
/// reaches near-zero within the intended training horizon. Linear with step
/// 0.01 lets an agent starting at ε = 1.0 reach zero exploration after about
/// 100 trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecaySchedule {
    /// Subtract a fixed step per trial, floored at zero.
    Linear { step: f64 },
    /// Multiply by a factor per trial, floored at `floor`.
    Geometric { factor: f64, floor: f64 },
}

impl DecaySchedule {
    /// Default linear step (near-zero exploration after ~100 trials).
    pub const DEFAULT_STEP: f64 = 0.01;

    /// Apply one trial's worth of decay to a rate.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            DecaySchedule::Linear { step } => (value - step).max(0.0),
            DecaySchedule::Geometric { factor, floor } => (value * factor).max(*floor),
        }
    }

    /// Validate the schedule's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the schedule could fail to
    /// decrease or could go negative.
    pub fn validate(&self) -> Result<()> {
        match self {
            DecaySchedule::Linear { step } => {
                if !step.is_finite() || *step <= 0.0 {
                    return Err(Error::InvalidConfiguration {
                        message: format!("linear decay step must be positive, got {step}"),
                    });
                }
            }
            DecaySchedule::Geometric { factor, floor } => {
                if !factor.is_finite() || !(0.0..1.0).contains(factor) {
                    return Err(Error::InvalidConfiguration {
                        message: format!("geometric decay factor must be in [0, 1), got {factor}"),
                    });
                }
                if !floor.is_finite() || *floor < 0.0 {
                    return Err(Error::InvalidConfiguration {
                        message: format!("geometric decay floor must be non-negative, got {floor}"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for DecaySchedule {
    fn default() -> Self {
        DecaySchedule::Linear {
            step: Self::DEFAULT_STEP,
        }
    }
}

impl fmt::Display for DecaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecaySchedule::Linear { step } => write!(f, "linear:{step}"),
            DecaySchedule::Geometric { factor, floor } => {
                write!(f, "geometric:{factor},{floor}")
            }
        }
    }
}

impl FromStr for DecaySchedule {
    type Err = Error;

    /// Parse `linear:STEP`, `geometric:FACTOR`, or `geometric:FACTOR,FLOOR`.
    fn from_str(input: &str) -> Result<Self> {
        let parse_err = |reason: &str| Error::ParseDecaySchedule {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (kind, params) = input
            .split_once(':')
            .ok_or_else(|| parse_err("expected 'kind:params', e.g. 'linear:0.01'"))?;

        let schedule = match kind.trim().to_ascii_lowercase().as_str() {
            "linear" => {
                let step: f64 = params
                    .trim()
                    .parse()
                    .map_err(|_| parse_err("step is not a number"))?;
                DecaySchedule::Linear { step }
            }
            "geometric" => {
                let (factor_str, floor_str) = match params.split_once(',') {
                    Some((factor, floor)) => (factor, floor),
                    None => (params, "0.0"),
                };
                let factor: f64 = factor_str
                    .trim()
                    .parse()
                    .map_err(|_| parse_err("factor is not a number"))?;
                let floor: f64 = floor_str
                    .trim()
                    .parse()
                    .map_err(|_| parse_err("floor is not a number"))?;
                DecaySchedule::Geometric { factor, floor }
            }
            _ => return Err(parse_err("expected kind 'linear' or 'geometric'")),
        };

        schedule.validate()?;
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_decay_floors_at_zero() {
        let schedule = DecaySchedule::Linear { step: 0.4 };
        let mut value = 1.0;
        value = schedule.apply(value);
        assert!((value - 0.6).abs() < 1e-12);
        value = schedule.apply(value);
        value = schedule.apply(value);
        assert_eq!(value, 0.0);
        assert_eq!(schedule.apply(value), 0.0);
    }

    #[test]
    fn test_geometric_decay_respects_floor() {
        let schedule = DecaySchedule::Geometric {
            factor: 0.5,
            floor: 0.1,
        };
        assert_eq!(schedule.apply(1.0), 0.5);
        assert_eq!(schedule.apply(0.15), 0.1);
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            "linear:0.05".parse::<DecaySchedule>().unwrap(),
            DecaySchedule::Linear { step: 0.05 }
        );
        assert_eq!(
            "geometric:0.995".parse::<DecaySchedule>().unwrap(),
            DecaySchedule::Geometric {
                factor: 0.995,
                floor: 0.0
            }
        );
        assert_eq!(
            "geometric:0.99,0.01".parse::<DecaySchedule>().unwrap(),
            DecaySchedule::Geometric {
                factor: 0.99,
                floor: 0.01
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("linear".parse::<DecaySchedule>().is_err());
        assert!("linear:-0.1".parse::<DecaySchedule>().is_err());
        assert!("geometric:1.5".parse::<DecaySchedule>().is_err());
        assert!("exponential:0.9".parse::<DecaySchedule>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let schedule = DecaySchedule::Linear { step: 0.01 };
        assert_eq!(
            schedule.to_string().parse::<DecaySchedule>().unwrap(),
            schedule
        );
    }
}
