//! Simulation constants and tuning parameters.
//!
//! Values that a balance pass may want to toggle at runtime are mirrored as
//! defaults in [`crate::config::BalanceConfig`].

// --- Host timing ---

/// Nominal host tick length in milliseconds (10 Hz).
pub const HOST_TICK_MS: f64 = 100.0;

/// Base attack interval at the reference speed (milliseconds).
pub const BASE_ATTACK_INTERVAL_MS: f64 = 2000.0;

// --- Attack variance ---

/// Lower bound of the auto-attack variance band.
pub const ATTACK_VARIANCE_MIN: f64 = 0.85;

/// Upper bound of the auto-attack variance band.
pub const ATTACK_VARIANCE_MAX: f64 = 1.15;

/// Armor is divided by this before being subtracted from attacker power.
pub const ARMOR_MITIGATION_DIVISOR: f64 = 2.0;

/// Minimum pre-variance damage of any auto-attack.
pub const MIN_ATTACK_DAMAGE: f64 = 1.0;

// --- Fortune ---

/// Crit chance with zero fortune.
pub const BASE_CRIT_CHANCE: f64 = 0.05;

/// Crit chance gained per point of fortune on the linear segment.
pub const CRIT_CHANCE_PER_FORTUNE: f64 = 0.02;

/// Hard cap on crit chance under every curve.
pub const CRIT_CHANCE_CAP: f64 = 0.50;

/// Fortune at which the diminishing-returns curve leaves its linear segment (35%).
pub const CRIT_LINEAR_CAP_FORTUNE: f64 = 15.0;

/// Default crit chance gained per fortune past the linear segment.
pub const DEFAULT_CRIT_DIMINISH_RATE: f64 = 0.005;

/// Crit damage multiplier with zero fortune.
pub const BASE_CRIT_MULTIPLIER: f64 = 1.5;

/// Legacy crit multiplier gain per fortune (uncapped).
pub const LEGACY_CRIT_MULTIPLIER_PER_FORTUNE: f64 = 0.05;

/// Diminishing-returns crit multiplier gain per fortune.
pub const CRIT_MULTIPLIER_PER_FORTUNE: f64 = 0.04;

/// Default ceiling on the diminishing-returns crit multiplier.
pub const DEFAULT_CRIT_MULTIPLIER_CAP: f64 = 2.5;

/// Dodge chance per point of fortune.
pub const DODGE_CHANCE_PER_FORTUNE: f64 = 0.01;

/// Dodge chance cap.
pub const DODGE_CHANCE_CAP: f64 = 0.25;

/// Loot quality (and gold) multiplier gain per fortune.
pub const DROP_QUALITY_PER_FORTUNE: f64 = 0.02;

/// Proc chance multiplier gain per fortune.
pub const PROC_BONUS_PER_FORTUNE: f64 = 0.01;

// --- Speed ---

/// Speed is clamped to this minimum before scaling.
pub const SPEED_MIN: f64 = 1.0;

/// Speed is clamped to this maximum before scaling.
pub const SPEED_MAX: f64 = 50.0;

/// Speed at which the multiplier is exactly 1.0 under every curve.
pub const SPEED_REFERENCE: f64 = 10.0;

/// Speed at which the soft-cap curve stops being linear (1.2x).
pub const SPEED_SOFT_CAP: f64 = 12.0;

/// Multiplier gained per speed point past the soft cap.
pub const SPEED_SOFT_CAP_SLOPE: f64 = 0.04;

// --- Powers ---

/// Damage bonus per combo level.
pub const COMBO_BONUS_PER_LEVEL: f64 = 0.1;

/// Highest reachable combo count.
pub const MAX_COMBO: u32 = 5;

// --- Block ---

/// How long a block stays raised (milliseconds).
pub const BLOCK_DURATION_MS: f64 = 1500.0;

/// Cooldown before block can be raised again (milliseconds).
pub const BLOCK_COOLDOWN_MS: f64 = 6000.0;

/// Fraction of an enemy hit absorbed by a raised block.
pub const BLOCK_DAMAGE_REDUCTION: f64 = 0.5;

// --- Powers ---

/// Duration of a buff power that does not name its own (milliseconds).
pub const DEFAULT_BUFF_DURATION_MS: f64 = 5000.0;

// --- Status effects ---

/// Length of one status "turn" in milliseconds of scaled time.
pub const STATUS_TICK_MS: f64 = 1000.0;

/// Default turns for poison and bleed.
pub const DOT_DEFAULT_TURNS: u32 = 3;

/// Default turns for stun.
pub const STUN_DEFAULT_TURNS: u32 = 1;

/// Default turns for slow.
pub const SLOW_DEFAULT_TURNS: u32 = 2;

/// Default turns for any status without its own default.
pub const GENERIC_DEFAULT_TURNS: u32 = 2;

/// Attack interval lengthening applied by a slow without an explicit value.
pub const SLOW_DEFAULT_VALUE: f64 = 0.3;

// --- Death & rewards ---

/// Time a dying enemy lingers before it is removed from the world.
pub const DYING_LINGER_MS: f64 = 600.0;

/// Experience required per level (`level * XP_PER_LEVEL` to advance).
pub const XP_PER_LEVEL: u64 = 100;

/// Level at which a build path can be chosen.
pub const PATH_UNLOCK_LEVEL: u32 = 5;

/// Per-level enemy stat growth (fraction of template stats).
pub const ENEMY_LEVEL_SCALING: f64 = 0.1;
