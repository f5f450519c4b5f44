#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::components::Stats;
    use crate::config::{BalanceConfig, ConfigError, FortuneCurve, SpeedCurve};
    use crate::enums::*;
    use crate::events::CombatEvent;
    use crate::state::CombatSnapshot;

    #[test]
    fn test_default_balance_config_is_valid() {
        let config = BalanceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.speed_curve, SpeedCurve::SoftCap);
        assert!(matches!(
            config.fortune_curve,
            FortuneCurve::DiminishingReturns { .. }
        ));
    }

    #[test]
    fn test_balance_config_partial_json_keeps_defaults() {
        let json = r#"{ "fortune_curve": { "mode": "legacy" }, "max_combo": 3 }"#;
        let config = BalanceConfig::from_json(json).unwrap();
        assert_eq!(config.fortune_curve, FortuneCurve::Legacy);
        assert_eq!(config.max_combo, 3);
        assert_eq!(
            config.base_attack_interval_ms,
            BalanceConfig::default().base_attack_interval_ms
        );
    }

    #[test]
    fn test_balance_config_rejects_inverted_variance() {
        let json = r#"{ "variance_min": 1.2, "variance_max": 0.9 }"#;
        let err = BalanceConfig::from_json(json).unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field: "variance_min", .. }),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_balance_config_rejects_malformed_json() {
        let err = BalanceConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_balance_config_rejects_low_crit_cap() {
        let json = r#"{ "fortune_curve": { "mode": "diminishing_returns", "diminish_rate": 0.01, "crit_multiplier_cap": 1.0 } }"#;
        assert!(BalanceConfig::from_json(json).is_err());
    }

    #[test]
    fn test_stats_heal_clamps_to_max() {
        let mut stats = Stats {
            health: 90.0,
            max_health: 100.0,
            ..Default::default()
        };
        let healed = stats.heal(25.0);
        assert_eq!(healed, 10.0);
        assert_eq!(stats.health, 100.0);
    }

    #[test]
    fn test_stats_health_ratio_missing_max() {
        let stats = Stats::default();
        assert_eq!(stats.health_ratio(), None);
    }

    #[test]
    fn test_combat_speed_multipliers() {
        assert_eq!(CombatSpeed::Normal.multiplier(), 1.0);
        assert_eq!(CombatSpeed::Double.multiplier(), 2.0);
        assert_eq!(CombatSpeed::Triple.multiplier(), 3.0);
    }

    #[test]
    fn test_paths_belong_to_classes() {
        assert_eq!(PathId::Berserker.class(), CharacterClass::Warrior);
        assert_eq!(PathId::Spellblade.class(), CharacterClass::Mage);
        assert_eq!(PathId::Shadowdancer.class(), CharacterClass::Rogue);
        assert_eq!(Stance::Bulwark.path(), PathId::Guardian);
        assert_eq!(Stance::Flurry.path(), PathId::Shadowdancer);
    }

    #[test]
    fn test_status_kind_names() {
        assert_eq!(StatusKind::Poison.name(), "poison");
        assert_eq!(StatusKind::Other("burn".into()).name(), "burn");
        assert!(StatusKind::Bleed.deals_damage());
        assert!(!StatusKind::Stun.deals_damage());
    }

    #[test]
    fn test_command_json_is_tagged() {
        let cmd = PlayerCommand::UsePower {
            power_id: "power_strike".into(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "UsePower");
        assert_eq!(json["power_id"], "power_strike");

        let back: PlayerCommand =
            serde_json::from_str(r#"{ "type": "SetCombatSpeed", "speed": "Triple" }"#).unwrap();
        assert!(matches!(
            back,
            PlayerCommand::SetCombatSpeed {
                speed: CombatSpeed::Triple
            }
        ));
    }

    #[test]
    fn test_snapshot_with_events_serializes() {
        let snapshot = CombatSnapshot {
            events: vec![CombatEvent::PlayerAttack {
                damage: 7.0,
                is_crit: false,
                is_dodge: false,
                target_died: false,
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"PlayerAttack\""));
        assert!(json.len() < 4096);
    }
}
