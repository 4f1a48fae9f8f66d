//! Status effects system
//!
//! Named, timed modifiers on an entity:
//! - Poison and regeneration act on every tick
//! - Modifiers shift effective attack/defense while active
//! - Stun prevents the entity from acting
//!
//! An entity carries at most one effect per name. A newly applied effect
//! with the same name replaces the old one only if it is stronger, and
//! extends it only if it would last longer; otherwise nothing changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clock::Interval;

/// Kind-specific parameters of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Damage every tick; the report is throttled separately
    Poison { damage: i32, message_cooldown: f64 },
    /// Healing every tick
    Regeneration { heal: i32 },
    /// Flat change to effective stats
    Modifier { attack: i32, defense: i32 },
    /// Cannot act
    Stun,
}

impl EffectKind {
    fn label(&self) -> &'static str {
        match self {
            EffectKind::Poison { .. } => "poison",
            EffectKind::Regeneration { .. } => "regeneration",
            EffectKind::Modifier { .. } => "modifier",
            EffectKind::Stun => "stun",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of an application or removal hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    pub applied: bool,
    pub message: Option<String>,
}

impl HookOutcome {
    fn applied(message: impl Into<String>) -> Self {
        Self {
            applied: true,
            message: Some(message.into()),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            applied: false,
            message: Some(message.into()),
        }
    }

    /// The message to show the player, if any
    pub fn surfaced(&self) -> Option<&str> {
        if !self.applied {
            return None;
        }
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// What happened to an entity during one effect update
#[derive(Debug, Clone, PartialEq)]
pub enum EffectEvent {
    /// Health lost to a ticking effect
    Damage {
        name: String,
        amount: i32,
        message: Option<String>,
    },
    /// Health restored by a ticking effect
    Heal {
        name: String,
        amount: i32,
        message: Option<String>,
    },
    /// The effect ran out and was removed
    Expired { name: String, outcome: HookOutcome },
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEffect {
    pub name: String,
    pub kind: EffectKind,
    /// Intensity, compared when the same effect is reapplied
    pub strength: u32,
    /// Total lifetime in seconds
    pub duration: f64,
    /// Time the effect was (re)applied
    pub start: f64,
    /// Seconds between ticks
    pub tick_interval: f64,
    ticks: Interval,
    reports: Interval,
}

impl StatusEffect {
    /// Create a new status effect starting at `now`
    pub fn new(name: &str, kind: EffectKind, strength: u32, duration: f64, now: f64) -> Self {
        let report_every = match kind {
            EffectKind::Poison {
                message_cooldown, ..
            } => message_cooldown,
            _ => 0.0,
        };
        Self {
            name: name.to_lowercase(),
            kind,
            strength,
            duration,
            start: now,
            tick_interval: 1.0,
            ticks: Interval::starting_at(1.0, now),
            reports: Interval::new(report_every),
        }
    }

    /// Poison dealing `damage` every `tick_interval` seconds
    pub fn poison(strength: u32, damage: i32, duration: f64, tick_interval: f64, now: f64) -> Self {
        Self::new(
            "poison",
            EffectKind::Poison {
                damage,
                message_cooldown: 10.0,
            },
            strength,
            duration,
            now,
        )
        .with_tick_interval(tick_interval)
    }

    /// Set the tick interval
    pub fn with_tick_interval(mut self, secs: f64) -> Self {
        self.tick_interval = secs;
        self.ticks = Interval::starting_at(secs, self.start);
        self
    }

    /// Seconds left at `now`
    pub fn remaining(&self, now: f64) -> f64 {
        (self.start + self.duration - now).max(0.0)
    }

    /// Check if effect has expired
    pub fn is_expired(&self, now: f64) -> bool {
        now >= self.start + self.duration
    }

    pub fn attack_modifier(&self) -> i32 {
        match self.kind {
            EffectKind::Modifier { attack, .. } => attack,
            _ => 0,
        }
    }

    pub fn defense_modifier(&self) -> i32 {
        match self.kind {
            EffectKind::Modifier { defense, .. } => defense,
            _ => 0,
        }
    }

    /// Whether this effect prevents actions
    pub fn prevents_action(&self) -> bool {
        matches!(self.kind, EffectKind::Stun)
    }

    /// Move the lifetime window so that `remaining` seconds are left at `now`
    pub fn rebase(&mut self, remaining: f64, now: f64) {
        self.start = now;
        self.duration = remaining;
        self.ticks = Interval::starting_at(self.tick_interval, now);
    }

    fn on_apply(&self, target: &str) -> HookOutcome {
        match &self.kind {
            EffectKind::Poison { .. } => HookOutcome::applied(format!("{} is poisoned!", target)),
            EffectKind::Regeneration { .. } => {
                HookOutcome::applied(format!("{} begins to regenerate.", target))
            }
            EffectKind::Modifier { attack, defense } => {
                if attack + defense >= 0 {
                    HookOutcome::applied(format!("{} feels empowered by {}.", target, self.name))
                } else {
                    HookOutcome::applied(format!("{} is weakened by {}.", target, self.name))
                }
            }
            EffectKind::Stun => HookOutcome::applied(format!("{} is stunned!", target)),
        }
    }

    fn on_remove(&self, target: &str) -> HookOutcome {
        match &self.kind {
            EffectKind::Poison { .. } => {
                HookOutcome::applied(format!("{} is no longer poisoned.", target))
            }
            EffectKind::Regeneration { .. } => {
                HookOutcome::applied(format!("{} stops regenerating.", target))
            }
            EffectKind::Modifier { .. } => {
                HookOutcome::applied(format!("The {} on {} wears off.", self.name, target))
            }
            EffectKind::Stun => HookOutcome::applied(format!("{} is no longer stunned.", target)),
        }
    }

    fn tick(&mut self, target: &str, now: f64) -> Option<EffectEvent> {
        if !self.ticks.fire(now) {
            return None;
        }
        match self.kind {
            EffectKind::Poison { damage, .. } => {
                // Damage always lands; only the report is rate-limited
                let message = self
                    .reports
                    .fire(now)
                    .then(|| format!("{} takes {} {} damage.", target, damage, self.name));
                Some(EffectEvent::Damage {
                    name: self.name.clone(),
                    amount: damage,
                    message,
                })
            }
            EffectKind::Regeneration { heal } => Some(EffectEvent::Heal {
                name: self.name.clone(),
                amount: heal,
                message: Some(format!("{} regenerates {} health.", target, heal)),
            }),
            EffectKind::Modifier { .. } | EffectKind::Stun => None,
        }
    }
}

/// Effects on a single entity, keyed by name
#[derive(Debug, Clone, Default)]
pub struct StatusEffects {
    effects: BTreeMap<String, StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect, honoring the stacking rule
    pub fn apply(&mut self, effect: StatusEffect, target: &str, now: f64) -> HookOutcome {
        match self.effects.get_mut(&effect.name) {
            None => {
                let outcome = effect.on_apply(target);
                self.effects.insert(effect.name.clone(), effect);
                outcome
            }
            Some(existing) if effect.strength > existing.strength => {
                let outcome = effect.on_apply(target);
                *existing = effect;
                outcome
            }
            Some(existing) if effect.remaining(now) > existing.remaining(now) => {
                existing.start = effect.start;
                existing.duration = effect.duration;
                HookOutcome::applied(format!(
                    "The {} on {} lasts longer.",
                    existing.name, target
                ))
            }
            Some(existing) => {
                HookOutcome::rejected(format!("{} is already affected by {}.", target, existing.name))
            }
        }
    }

    /// Remove an effect by name, running its removal hook
    pub fn remove(&mut self, name: &str, target: &str) -> Option<HookOutcome> {
        self.effects
            .remove(&name.to_lowercase())
            .map(|effect| effect.on_remove(target))
    }

    /// Insert without hooks or stacking (used when restoring saves)
    pub fn restore(&mut self, effect: StatusEffect) {
        self.effects.insert(effect.name.clone(), effect);
    }

    pub fn has(&self, name: &str) -> bool {
        self.effects.contains_key(&name.to_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&StatusEffect> {
        self.effects.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.values()
    }

    /// Sum of attack modifiers
    pub fn attack_modifier(&self) -> i32 {
        self.effects.values().map(|e| e.attack_modifier()).sum()
    }

    /// Sum of defense modifiers
    pub fn defense_modifier(&self) -> i32 {
        self.effects.values().map(|e| e.defense_modifier()).sum()
    }

    /// Check if entity can act (not stunned)
    pub fn can_act(&self) -> bool {
        !self.effects.values().any(|e| e.prevents_action())
    }

    /// Expire finished effects and tick the rest
    pub fn update(&mut self, target: &str, now: f64) -> Vec<EffectEvent> {
        let mut events = Vec::new();

        let expired: Vec<String> = self
            .effects
            .values()
            .filter(|e| e.is_expired(now))
            .map(|e| e.name.clone())
            .collect();

        for name in expired {
            if let Some(effect) = self.effects.remove(&name) {
                events.push(EffectEvent::Expired {
                    outcome: effect.on_remove(target),
                    name,
                });
            }
        }

        for effect in self.effects.values_mut() {
            if let Some(event) = effect.tick(target, now) {
                events.push(event);
            }
        }

        events
    }

    /// Clear all effects
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
