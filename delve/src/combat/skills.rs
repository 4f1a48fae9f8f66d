//! Skills
//!
//! A skill is a capability object: it says whether an actor may use it
//! and what happens when it is used. Cooldowns are not the skill's
//! business; the [`SkillBook`] stores a next-available timestamp per
//! skill, so they persist across combat sessions.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::damage::calculate_damage;
use super::dice::DiceRoll;
use crate::catalog::EffectSpec;
use crate::entity::Entity;

/// State a skill acts on
pub struct SkillContext<'a> {
    pub user: &'a mut Entity,
    pub now: f64,
    pub rng: &'a mut dyn RngCore,
}

pub trait Skill: Send + Sync {
    fn name(&self) -> &str;

    /// Seconds before the skill can be used again
    fn cooldown(&self) -> f64;

    /// Whether the skill acts on an enemy
    fn needs_target(&self) -> bool;

    /// Check whether `actor` may use the skill now, with the reason if not
    fn can_use(&self, actor: &Entity, _now: f64) -> Result<(), String> {
        if !actor.is_alive() {
            return Err("You cannot fight back from beyond the grave.".to_string());
        }
        if !actor.can_act() {
            return Err("You are unable to act!".to_string());
        }
        Ok(())
    }

    /// Perform the skill, returning the message to show
    fn activate(&self, ctx: &mut SkillContext<'_>, target: Option<&mut Entity>) -> String;
}

/// What a [`StandardSkill`] does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "power", rename_all = "snake_case")]
pub enum SkillPower {
    /// Attack with a multiplied attack value
    Strike { multiplier: f64 },
    /// Roll fixed damage, ignoring defense
    Dice { dice: DiceRoll },
    /// Put an effect on the target
    Inflict { spec: EffectSpec },
    /// Put an effect on the user
    Bolster { spec: EffectSpec },
    /// Heal the user
    Mend { amount: i32 },
}

/// Data-driven skill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardSkill {
    pub name: String,
    pub cooldown: f64,
    pub power: SkillPower,
}

impl StandardSkill {
    pub fn new(name: &str, cooldown: f64, power: SkillPower) -> Self {
        Self {
            name: name.to_lowercase(),
            cooldown,
            power,
        }
    }
}

impl Skill for StandardSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn cooldown(&self) -> f64 {
        self.cooldown
    }

    fn needs_target(&self) -> bool {
        matches!(
            self.power,
            SkillPower::Strike { .. } | SkillPower::Dice { .. } | SkillPower::Inflict { .. }
        )
    }

    fn activate(&self, ctx: &mut SkillContext<'_>, target: Option<&mut Entity>) -> String {
        match (&self.power, target) {
            (SkillPower::Mend { amount }, _) => {
                let healed = ctx.user.heal(*amount);
                format!("You use {} and recover {} health.", self.name, healed)
            }
            (SkillPower::Bolster { spec }, _) => {
                let outcome = ctx.user.apply_effect(spec.instantiate(ctx.now), ctx.now);
                match outcome.surfaced() {
                    Some(message) => format!("You use {}. {}", self.name, message),
                    None => format!("You use {}, but nothing changes.", self.name),
                }
            }
            (_, None) => format!("{} needs a target.", self.name),
            (SkillPower::Strike { multiplier }, Some(target)) => {
                let attack = (ctx.user.effective_attack() as f64 * multiplier).round() as i32;
                let amount = calculate_damage(attack, target.effective_defense());
                let result = target.take_damage(amount);
                strike_message(&self.name, &target.name, result.amount, result.killed)
            }
            (SkillPower::Dice { dice }, Some(target)) => {
                let amount = dice.roll(&mut *ctx.rng).max(1);
                let result = target.take_damage(amount);
                strike_message(&self.name, &target.name, result.amount, result.killed)
            }
            (SkillPower::Inflict { spec }, Some(target)) => {
                let outcome = target.apply_effect(spec.instantiate(ctx.now), ctx.now);
                match outcome.surfaced() {
                    Some(message) => format!("You use {}. {}", self.name, message),
                    None => format!(
                        "Your {} has no further effect on the {}.",
                        self.name, target.name
                    ),
                }
            }
        }
    }
}

fn strike_message(skill: &str, target: &str, amount: i32, killed: bool) -> String {
    let mut message = format!("Your {} hits the {} for {} damage.", skill, target, amount);
    if killed {
        message.push_str(&format!(" The {} is defeated!", target));
    }
    message
}

/// Known skills and their cooldowns
#[derive(Clone, Default)]
pub struct SkillBook {
    skills: BTreeMap<String, Arc<dyn Skill>>,
    next_available: BTreeMap<String, f64>,
}

impl std::fmt::Debug for SkillBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillBook")
            .field("skills", &self.skills.keys().collect::<Vec<_>>())
            .field("next_available", &self.next_available)
            .finish()
    }
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skill(mut self, skill: impl Skill + 'static) -> Self {
        self.learn(Arc::new(skill));
        self
    }

    pub fn learn(&mut self, skill: Arc<dyn Skill>) {
        self.skills.insert(skill.name().to_lowercase(), skill);
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.skills.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Seconds until `name` is ready at `now`
    pub fn remaining_cooldown(&self, name: &str, now: f64) -> f64 {
        self.next_available
            .get(&name.to_lowercase())
            .map(|t| (t - now).max(0.0))
            .unwrap_or(0.0)
    }

    /// Look up a skill and check it is ready and usable by `actor`
    pub fn check(&self, name: &str, actor: &Entity, now: f64) -> Result<Arc<dyn Skill>, String> {
        let key = name.trim().to_lowercase();
        let skill = self
            .skills
            .get(&key)
            .or_else(|| {
                self.skills
                    .iter()
                    .find(|(k, _)| k.starts_with(&key))
                    .map(|(_, s)| s)
            })
            .filter(|_| !key.is_empty())
            .ok_or_else(|| format!("You don't know a skill called {}.", name.trim()))?;

        let wait = self.remaining_cooldown(skill.name(), now);
        if wait > 0.0 {
            return Err(format!("{} is not ready yet ({:.1}s).", skill.name(), wait));
        }
        skill.can_use(actor, now)?;
        Ok(skill.clone())
    }

    /// Start the cooldown of a skill that was just used
    pub fn commit(&mut self, skill: &dyn Skill, now: f64) {
        self.next_available
            .insert(skill.name().to_lowercase(), now + skill.cooldown());
    }

    /// Remaining cooldowns, for saving
    pub fn cooldowns(&self, now: f64) -> BTreeMap<String, f64> {
        self.next_available
            .iter()
            .map(|(name, t)| (name.clone(), (t - now).max(0.0)))
            .filter(|(_, remaining)| *remaining > 0.0)
            .collect()
    }

    /// Re-base saved remaining cooldowns onto `now`
    pub fn restore_cooldowns(&mut self, remaining: &BTreeMap<String, f64>, now: f64) {
        self.next_available = remaining
            .iter()
            .map(|(name, secs)| (name.clone(), now + secs))
            .collect();
    }

    pub fn reset_cooldowns(&mut self) {
        self.next_available.clear();
    }
}
