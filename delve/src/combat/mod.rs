//! Combat system module
//!
//! Turn-based fights between the player and enemies:
//! - Dice rolls for skill power
//! - Symmetric damage with a floor of 1
//! - Timed status effects (poison, regeneration, modifiers, stun)
//! - Encounter sessions with a fixed initiative order
//! - Skills with per-skill cooldowns

mod damage;
mod dice;
mod effects;
mod session;
mod skills;

pub use damage::{calculate_damage, resolve_attack, DamageResult, MIN_DAMAGE};
pub use dice::DiceRoll;
pub use effects::{EffectEvent, EffectKind, HookOutcome, StatusEffect, StatusEffects};
pub use session::{CombatSession, Combatant, EnemyPhase};
pub use skills::{Skill, SkillBook, SkillContext, SkillPower, StandardSkill};
