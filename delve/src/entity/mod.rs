//! Entity model
//!
//! Anything that fights: the player and every enemy. Health, base stats,
//! gear bonuses and an effect container. Effective stats are always
//! clamped to zero no matter how many penalties are stacked.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combat::{DamageResult, EffectEvent, HookOutcome, StatusEffect, StatusEffects};
use crate::loot::Rarity;

/// Experience needed per level
pub const XP_PER_LEVEL: i32 = 100;

/// A living participant in combat/exploration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub health: i32,
    pub max_health: i32,
    /// Base attack
    pub attack: i32,
    /// Base defense
    pub defense: i32,
    pub level: u32,
    /// Experience held (player) or granted on defeat (enemy)
    pub experience: i32,
    /// Initiative bonus; higher acts first
    #[serde(default)]
    pub initiative: i32,
    /// Attacks on sight
    #[serde(default)]
    pub aggressive: bool,
    /// Drops loot of this tier when defeated
    #[serde(default)]
    pub loot_tier: Option<Rarity>,
    #[serde(default)]
    pub gear_attack: i32,
    #[serde(default)]
    pub gear_defense: i32,
    alive: bool,
    #[serde(skip)]
    effects: StatusEffects,
}

impl Entity {
    /// Create a new entity at full health
    pub fn new(name: &str, max_health: i32, attack: i32, defense: i32) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            health: max_health,
            max_health,
            attack,
            defense,
            level: 1,
            experience: 0,
            initiative: 0,
            aggressive: false,
            loot_tier: None,
            gear_attack: 0,
            gear_defense: 0,
            alive: true,
            effects: StatusEffects::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_experience(mut self, experience: i32) -> Self {
        self.experience = experience;
        self
    }

    pub fn with_loot(mut self, tier: Rarity) -> Self {
        self.loot_tier = Some(tier);
        self
    }

    pub fn aggressive(mut self) -> Self {
        self.aggressive = true;
        self
    }

    /// Alive means positive health and no scripted defeat
    pub fn is_alive(&self) -> bool {
        self.health > 0 && self.alive
    }

    pub fn effective_attack(&self) -> i32 {
        (self.attack + self.gear_attack + self.effects.attack_modifier()).max(0)
    }

    pub fn effective_defense(&self) -> i32 {
        (self.defense + self.gear_defense + self.effects.defense_modifier()).max(0)
    }

    /// Fraction of max health remaining, 0.0..=1.0
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health.max(0) as f64 / self.max_health as f64).clamp(0.0, 1.0)
    }

    /// Take damage; the returned `killed` is true only on the killing blow
    pub fn take_damage(&mut self, amount: i32) -> DamageResult {
        let amount = amount.max(0).min(self.health.max(0));
        self.health -= amount;
        let killed = self.health <= 0 && self.on_death();
        DamageResult {
            amount,
            remaining: self.health,
            killed,
        }
    }

    /// Heal (cannot exceed max health); returns the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let actual = amount.max(0).min(self.max_health - self.health);
        self.health += actual;
        actual
    }

    /// Fully restore health
    pub fn restore_full(&mut self) {
        if self.alive {
            self.health = self.max_health;
        }
    }

    /// Scripted defeat regardless of health. Returns true the first time.
    pub fn kill(&mut self) -> bool {
        self.on_death()
    }

    /// One-shot death hook
    fn on_death(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.effects.clear();
        info!("{} has died", self.name);
        true
    }

    /// Bring a dead entity back at full health with no effects
    pub fn revive(&mut self) {
        self.alive = true;
        self.health = self.max_health;
        self.effects.clear();
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut StatusEffects {
        &mut self.effects
    }

    pub fn can_act(&self) -> bool {
        self.is_alive() && self.effects.can_act()
    }

    /// Apply a status effect; dead entities are unaffected
    pub fn apply_effect(&mut self, effect: StatusEffect, now: f64) -> HookOutcome {
        if !self.is_alive() {
            return HookOutcome {
                applied: false,
                message: None,
            };
        }
        self.effects.apply(effect, &self.name, now)
    }

    /// Remove a named effect early
    pub fn cure(&mut self, name: &str) -> Option<HookOutcome> {
        self.effects.remove(name, &self.name)
    }

    /// Tick effects and apply their health changes, returning player-facing messages
    pub fn update_effects(&mut self, now: f64) -> Vec<String> {
        if !self.is_alive() {
            return Vec::new();
        }
        let events = self.effects.update(&self.name, now);
        let mut messages = Vec::new();
        for event in events {
            match event {
                EffectEvent::Damage {
                    amount, message, ..
                } => {
                    messages.extend(message);
                    if self.take_damage(amount).killed {
                        messages.push(format!("{} succumbs.", self.name));
                        break;
                    }
                }
                EffectEvent::Heal {
                    amount, message, ..
                } => {
                    if self.heal(amount) > 0 {
                        messages.extend(message);
                    }
                }
                EffectEvent::Expired { outcome, .. } => {
                    messages.extend(outcome.surfaced().map(str::to_string));
                }
            }
        }
        messages
    }

    /// Experience needed to reach the next level
    pub fn next_level_at(&self) -> i32 {
        self.level as i32 * XP_PER_LEVEL
    }

    /// Grant experience, levelling up as often as it allows.
    /// Returns the number of levels gained.
    pub fn grant_experience(&mut self, amount: i32) -> u32 {
        self.experience += amount.max(0);
        let mut gained = 0;
        while self.experience >= self.next_level_at() {
            self.experience -= self.next_level_at();
            self.level += 1;
            self.max_health += 10;
            self.attack += 2;
            self.defense += 1;
            gained += 1;
        }
        if gained > 0 {
            self.restore_full();
            info!("{} reached level {}", self.name, self.level);
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::EffectKind;

    fn curse(attack: i32, defense: i32) -> StatusEffect {
        StatusEffect::new("curse", EffectKind::Modifier { attack, defense }, 1, 30.0, 0.0)
    }

    #[test]
    fn test_effective_stats_never_negative() {
        let mut hero = Entity::new("Hero", 30, 4, 2);
        hero.apply_effect(curse(-10, -10), 0.0);
        assert_eq!(hero.effective_attack(), 0);
        assert_eq!(hero.effective_defense(), 0);
    }

    #[test]
    fn test_gear_and_effects_stack() {
        let mut hero = Entity::new("Hero", 30, 10, 5);
        hero.gear_attack = 3;
        hero.apply_effect(curse(-1, 2), 0.0);
        assert_eq!(hero.effective_attack(), 12);
        assert_eq!(hero.effective_defense(), 7);
    }

    #[test]
    fn test_death_hook_fires_once() {
        let mut rat = Entity::new("Rat", 4, 1, 0);
        assert!(!rat.take_damage(3).killed);
        let result = rat.take_damage(10);
        assert!(result.killed);
        assert_eq!(result.amount, 1);
        assert_eq!(rat.health, 0);
        assert!(!rat.take_damage(1).killed);
        assert!(!rat.kill());
    }

    #[test]
    fn test_scripted_death_independent_of_health() {
        let mut boss = Entity::new("Boss", 100, 10, 10);
        assert!(boss.kill());
        assert_eq!(boss.health, 100);
        assert!(!boss.is_alive());
        assert_eq!(boss.heal(10), 0);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut hero = Entity::new("Hero", 30, 5, 5);
        hero.take_damage(10);
        assert_eq!(hero.heal(4), 4);
        assert_eq!(hero.heal(50), 6);
        assert_eq!(hero.health, 30);
    }

    #[test]
    fn test_poison_can_kill() {
        let mut hero = Entity::new("Hero", 3, 5, 5);
        hero.apply_effect(StatusEffect::poison(1, 2, 60.0, 1.0, 0.0), 0.0);
        let first = hero.update_effects(1.0);
        assert_eq!(first, vec!["Hero takes 2 poison damage.".to_string()]);
        let second = hero.update_effects(2.0);
        assert!(second.contains(&"Hero succumbs.".to_string()));
        assert!(!hero.is_alive());
    }

    #[test]
    fn test_level_up() {
        let mut hero = Entity::new("Hero", 30, 5, 5);
        hero.take_damage(10);
        assert_eq!(hero.grant_experience(350), 2);
        assert_eq!(hero.level, 3);
        assert_eq!(hero.experience, 50);
        assert_eq!(hero.max_health, 50);
        assert_eq!(hero.health, 50);
        assert_eq!(hero.attack, 9);
    }
}
