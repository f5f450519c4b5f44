//! Fortune and speed scaling formulas.
//!
//! Pure functions. Every consumer calls the same signature and passes the
//! curve selected in [`BalanceConfig`](delve_core::config::BalanceConfig);
//! the curve is chosen once per calculation, never deep inside combat code.
//! Non-finite input is logged and replaced with zero rather than propagated.

use delve_core::config::{FortuneCurve, SpeedCurve};
use delve_core::constants::*;

/// Replace a non-finite stat with zero, logging the corruption.
fn sanitize(stat: &'static str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::error!(stat, value, "non-finite stat input, substituting 0");
        0.0
    }
}

fn fortune_input(fortune: f64) -> f64 {
    sanitize("fortune", fortune).max(0.0)
}

/// Chance (0.0 - 0.5) that an attack crits.
pub fn crit_chance(fortune: f64, curve: FortuneCurve) -> f64 {
    let fortune = fortune_input(fortune);
    let linear = BASE_CRIT_CHANCE + fortune * CRIT_CHANCE_PER_FORTUNE;

    match curve {
        FortuneCurve::Legacy => linear.min(CRIT_CHANCE_CAP),
        FortuneCurve::DiminishingReturns { diminish_rate, .. } => {
            if fortune <= CRIT_LINEAR_CAP_FORTUNE {
                linear.min(CRIT_CHANCE_CAP)
            } else {
                let at_cap = BASE_CRIT_CHANCE + CRIT_LINEAR_CAP_FORTUNE * CRIT_CHANCE_PER_FORTUNE;
                let extra = (fortune - CRIT_LINEAR_CAP_FORTUNE) * diminish_rate.max(0.0);
                (at_cap + extra).min(CRIT_CHANCE_CAP)
            }
        }
    }
}

/// Damage multiplier applied to critical hits.
pub fn crit_damage_multiplier(fortune: f64, curve: FortuneCurve) -> f64 {
    let fortune = fortune_input(fortune);

    match curve {
        FortuneCurve::Legacy => BASE_CRIT_MULTIPLIER + fortune * LEGACY_CRIT_MULTIPLIER_PER_FORTUNE,
        FortuneCurve::DiminishingReturns {
            crit_multiplier_cap,
            ..
        } => {
            let max_bonus = (crit_multiplier_cap - BASE_CRIT_MULTIPLIER).max(0.0);
            BASE_CRIT_MULTIPLIER + (fortune * CRIT_MULTIPLIER_PER_FORTUNE).min(max_bonus)
        }
    }
}

/// Chance (0.0 - 0.25) to dodge an incoming attack.
pub fn dodge_chance(fortune: f64) -> f64 {
    (fortune_input(fortune) * DODGE_CHANCE_PER_FORTUNE).min(DODGE_CHANCE_CAP)
}

/// Multiplier on loot-rarity rolls and gold rewards.
pub fn drop_quality_bonus(fortune: f64) -> f64 {
    1.0 + fortune_input(fortune) * DROP_QUALITY_PER_FORTUNE
}

/// Multiplier on path-ability proc chances.
pub fn proc_chance_bonus(fortune: f64) -> f64 {
    1.0 + fortune_input(fortune) * PROC_BONUS_PER_FORTUNE
}

/// Attack-rate multiplier for a speed stat. Exactly 1.0 at speed 10.
pub fn speed_multiplier(speed: f64, curve: SpeedCurve) -> f64 {
    let speed = sanitize("speed", speed).clamp(SPEED_MIN, SPEED_MAX);

    match curve {
        SpeedCurve::Legacy => (speed / SPEED_REFERENCE).sqrt(),
        SpeedCurve::SoftCap => {
            if speed <= SPEED_SOFT_CAP {
                speed / SPEED_REFERENCE
            } else {
                SPEED_SOFT_CAP / SPEED_REFERENCE + (speed - SPEED_SOFT_CAP) * SPEED_SOFT_CAP_SLOPE
            }
        }
    }
}

/// Milliseconds between attacks for a speed stat.
pub fn attack_interval(speed: f64, base_interval_ms: f64, curve: SpeedCurve) -> f64 {
    let base = sanitize("base_interval_ms", base_interval_ms);
    let base = if base > 0.0 {
        base
    } else {
        BASE_ATTACK_INTERVAL_MS
    };
    (base / speed_multiplier(speed, curve)).floor()
}
