//! Damage resolution
//!
//! Attacks are symmetric: the same formula is used whoever swings.
//! A hit always does something, so damage never drops below 1, even for
//! an attacker with zero effective attack.

use crate::entity::Entity;

/// Minimum damage of any hit
pub const MIN_DAMAGE: i32 = 1;

/// Result of applying damage to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    /// Damage actually applied
    pub amount: i32,
    /// Target health afterwards
    pub remaining: i32,
    /// Whether this hit killed the target (fires once per entity)
    pub killed: bool,
}

/// Damage for an attack value against a defense value
pub fn calculate_damage(attack: i32, defense: i32) -> i32 {
    (attack - defense).max(MIN_DAMAGE)
}

/// Resolve a basic attack between two entities
pub fn resolve_attack(attacker: &Entity, defender: &mut Entity) -> DamageResult {
    let amount = calculate_damage(attacker.effective_attack(), defender.effective_defense());
    defender.take_damage(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_formula() {
        assert_eq!(calculate_damage(10, 3), 7);
        assert_eq!(calculate_damage(5, 5), 1);
        assert_eq!(calculate_damage(2, 40), 1);
        assert_eq!(calculate_damage(0, 0), 1);
    }

    #[test]
    fn test_resolve_attack() {
        let player = Entity::new("Hero", 30, 10, 5);
        let mut goblin = Entity::new("Goblin", 12, 4, 3);

        let result = resolve_attack(&player, &mut goblin);
        assert_eq!(result.amount, 7);
        assert_eq!(result.remaining, 5);
        assert!(!result.killed);

        let result = resolve_attack(&player, &mut goblin);
        assert_eq!(result.amount, 5);
        assert!(result.killed);
        assert!(!goblin.is_alive());
    }

    #[test]
    fn test_high_defense_still_takes_damage() {
        let rat = Entity::new("Rat", 5, 1, 0);
        let mut knight = Entity::new("Knight", 50, 10, 99);
        let result = resolve_attack(&rat, &mut knight);
        assert_eq!(result.amount, 1);
        assert_eq!(knight.health, 49);
    }
}
