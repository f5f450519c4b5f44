//! Balance configuration.
//!
//! Every field defaults to the matching constant in [`crate::constants`], so
//! a JSON file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Errors raised while loading or validating a [`BalanceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse balance config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid balance config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Which fortune formula family to use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FortuneCurve {
    /// Linear crit chance to 50%, uncapped crit multiplier.
    Legacy,
    /// Linear crit chance to 35%, then `diminish_rate` per fortune up to 50%;
    /// crit multiplier capped at `crit_multiplier_cap`.
    DiminishingReturns {
        diminish_rate: f64,
        crit_multiplier_cap: f64,
    },
}

impl Default for FortuneCurve {
    fn default() -> Self {
        FortuneCurve::DiminishingReturns {
            diminish_rate: DEFAULT_CRIT_DIMINISH_RATE,
            crit_multiplier_cap: DEFAULT_CRIT_MULTIPLIER_CAP,
        }
    }
}

/// Which speed formula family to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCurve {
    /// `sqrt(speed / 10)`.
    Legacy,
    /// Linear to 1.2x at speed 12, then a shallow slope.
    #[default]
    SoftCap,
}

/// Runtime-tunable balance values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub fortune_curve: FortuneCurve,
    pub speed_curve: SpeedCurve,
    pub base_attack_interval_ms: f64,
    pub variance_min: f64,
    pub variance_max: f64,
    pub combo_bonus_per_level: f64,
    pub max_combo: u32,
    pub block_damage_reduction: f64,
    pub block_duration_ms: f64,
    pub block_cooldown_ms: f64,
    pub status_tick_ms: f64,
    pub dying_linger_ms: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            fortune_curve: FortuneCurve::default(),
            speed_curve: SpeedCurve::default(),
            base_attack_interval_ms: BASE_ATTACK_INTERVAL_MS,
            variance_min: ATTACK_VARIANCE_MIN,
            variance_max: ATTACK_VARIANCE_MAX,
            combo_bonus_per_level: COMBO_BONUS_PER_LEVEL,
            max_combo: MAX_COMBO,
            block_damage_reduction: BLOCK_DAMAGE_REDUCTION,
            block_duration_ms: BLOCK_DURATION_MS,
            block_cooldown_ms: BLOCK_COOLDOWN_MS,
            status_tick_ms: STATUS_TICK_MS,
            dying_linger_ms: DYING_LINGER_MS,
        }
    }
}

impl BalanceConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
            ConfigError::Invalid { field, reason }
        }

        if !(self.base_attack_interval_ms.is_finite() && self.base_attack_interval_ms > 0.0) {
            return Err(invalid("base_attack_interval_ms", "must be positive"));
        }
        if !(self.variance_min > 0.0 && self.variance_min <= self.variance_max) {
            return Err(invalid("variance_min", "must be positive and <= variance_max"));
        }
        if !self.variance_max.is_finite() {
            return Err(invalid("variance_max", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.block_damage_reduction) {
            return Err(invalid("block_damage_reduction", "must be within [0, 1]"));
        }
        if !(self.status_tick_ms.is_finite() && self.status_tick_ms > 0.0) {
            return Err(invalid("status_tick_ms", "must be positive"));
        }
        if self.combo_bonus_per_level < 0.0 {
            return Err(invalid("combo_bonus_per_level", "must not be negative"));
        }
        if let FortuneCurve::DiminishingReturns {
            diminish_rate,
            crit_multiplier_cap,
        } = self.fortune_curve
        {
            if !(diminish_rate.is_finite() && diminish_rate >= 0.0) {
                return Err(invalid("diminish_rate", "must be finite and non-negative"));
            }
            if !(crit_multiplier_cap.is_finite() && crit_multiplier_cap >= BASE_CRIT_MULTIPLIER) {
                return Err(invalid("crit_multiplier_cap", "must be at least the base multiplier"));
            }
        }
        Ok(())
    }
}
