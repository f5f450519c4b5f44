//! Status effect engine.
//!
//! [`apply_status`] is copy-on-write: it never touches the list it is given
//! and returns the new list together with the log lines describing what
//! happened. [`inflict`] is the ECS glue used by powers and path abilities.

use hecs::{Entity, World};

use delve_core::components::{Combatant, Immunities, StatusEffect, StatusEffects};
use delve_core::constants::*;
use delve_core::enums::{CombatantKind, StatusKind};
use delve_core::events::CombatEvent;

use crate::combat_log::TickLog;

/// A request to put a status on a combatant.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusApplication {
    pub kind: StatusKind,
    /// Falls back to the per-kind default.
    pub turns: Option<u32>,
    pub damage: Option<f64>,
    pub value: Option<f64>,
}

/// Who a status is being applied to, for log wording.
#[derive(Debug, Clone, Copy)]
pub struct StatusTarget<'a> {
    pub kind: CombatantKind,
    pub name: &'a str,
}

impl StatusTarget<'_> {
    /// "You are" / "Goblin is".
    fn subject(&self) -> String {
        match self.kind {
            CombatantKind::Player => "You are".to_string(),
            CombatantKind::Enemy => format!("{} is", self.name),
        }
    }

    fn possessive(&self) -> String {
        match self.kind {
            CombatantKind::Player => "Your".to_string(),
            CombatantKind::Enemy => format!("{}'s", self.name),
        }
    }

    fn resists(&self) -> String {
        match self.kind {
            CombatantKind::Player => "You resist".to_string(),
            CombatantKind::Enemy => format!("{} resists", self.name),
        }
    }
}

/// Result of [`apply_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOutcome {
    pub effects: StatusEffects,
    pub logs: Vec<String>,
    /// False when the target was immune.
    pub applied: bool,
}

pub fn has_status(effects: &StatusEffects, kind: &StatusKind) -> bool {
    effects.get(kind).is_some()
}

pub fn default_turns(kind: &StatusKind) -> u32 {
    match kind {
        StatusKind::Poison | StatusKind::Bleed => DOT_DEFAULT_TURNS,
        StatusKind::Stun => STUN_DEFAULT_TURNS,
        StatusKind::Slow => SLOW_DEFAULT_TURNS,
        StatusKind::Other(_) => GENERIC_DEFAULT_TURNS,
    }
}

fn default_icon(kind: &StatusKind) -> String {
    match kind {
        StatusKind::Other(_) => "status-generic".to_string(),
        known => format!("status-{}", known.name()),
    }
}

/// Past-tense description used after "is" / "are".
fn affliction(kind: &StatusKind) -> String {
    match kind {
        StatusKind::Poison => "poisoned!".to_string(),
        StatusKind::Stun => "stunned!".to_string(),
        StatusKind::Slow => "slowed!".to_string(),
        StatusKind::Bleed => "bleeding!".to_string(),
        StatusKind::Other(name) => format!("affected by {name}."),
    }
}

/// Apply or refresh a status.
///
/// One effect per kind: a second application replaces the duration and
/// keeps the larger damage and value.
pub fn apply_status(
    target_effects: &StatusEffects,
    target: StatusTarget<'_>,
    application: &StatusApplication,
    source: &str,
    immunities: Option<&Immunities>,
) -> StatusOutcome {
    let kind = &application.kind;

    if immunities.is_some_and(|imm| imm.kinds.contains(kind)) {
        return StatusOutcome {
            effects: target_effects.clone(),
            logs: vec![format!("{} {}!", target.resists(), kind.name())],
            applied: false,
        };
    }

    let turns = application.turns.unwrap_or_else(|| default_turns(kind));
    let value = match (kind, application.value) {
        (StatusKind::Slow, None) => Some(SLOW_DEFAULT_VALUE),
        (_, value) => value,
    };

    let mut effects = target_effects.clone();
    let logs = if let Some(existing) = effects.effects.iter_mut().find(|e| &e.kind == kind) {
        existing.remaining_turns = turns;
        existing.damage = max_option(existing.damage, application.damage);
        existing.value = max_option(existing.value, value);
        existing.source = source.to_string();
        vec![format!("{} {} is refreshed.", target.possessive(), kind.name())]
    } else {
        let id = effects.effects.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        effects.effects.push(StatusEffect {
            id,
            kind: kind.clone(),
            damage: application.damage,
            value,
            remaining_turns: turns,
            icon: default_icon(kind),
            source: source.to_string(),
        });
        vec![format!("{} {}", target.subject(), affliction(kind))]
    };

    StatusOutcome {
        effects,
        logs,
        applied: true,
    }
}

fn max_option(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Apply a status to `target` in the world, recording events and log lines.
/// Returns whether it landed.
pub fn inflict(
    world: &mut World,
    target: Entity,
    application: &StatusApplication,
    source: &str,
    log: &mut TickLog,
) -> bool {
    let Ok(combatant) = world.get::<&Combatant>(target).map(|c| (*c).clone()) else {
        tracing::warn!(?target, "status target has no combatant component");
        return false;
    };
    let immunities = world.get::<&Immunities>(target).ok().map(|imm| (*imm).clone());
    let Ok(mut effects) = world.get::<&mut StatusEffects>(target) else {
        tracing::warn!(?target, "status target has no status list");
        return false;
    };

    let outcome = apply_status(
        &effects,
        StatusTarget {
            kind: combatant.kind,
            name: &combatant.name,
        },
        application,
        source,
        immunities.as_ref(),
    );
    *effects = outcome.effects;

    for line in outcome.logs {
        log.line(line);
    }
    log.event(if outcome.applied {
        CombatEvent::StatusApplied {
            target: combatant.kind,
            kind: application.kind.clone(),
        }
    } else {
        CombatEvent::StatusResisted {
            target: combatant.kind,
            kind: application.kind.clone(),
        }
    });
    outcome.applied
}
