//! Combat sessions
//!
//! One encounter between the player and a group of enemies. The
//! initiative order is fixed when the session starts: higher initiative
//! acts first, ties keep insertion order, and the player is inserted
//! before the enemies. Defeated enemies stay in the order and are
//! skipped, so indexes into `enemies` stay valid for the whole encounter.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::damage::resolve_attack;
use crate::entity::Entity;

/// A slot in the initiative order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combatant {
    Player,
    Enemy(usize),
}

/// Messages from the enemies' part of a round
#[derive(Debug, Default)]
pub struct EnemyPhase {
    pub messages: Vec<String>,
    pub player_defeated: bool,
}

#[derive(Debug, Clone)]
pub struct CombatSession {
    enemies: Vec<Entity>,
    order: Vec<Combatant>,
    current: usize,
    active: bool,
    /// Enemies whose defeat has been handed out already
    reported: BTreeSet<usize>,
}

impl CombatSession {
    /// Start an encounter
    pub fn start(player: &Entity, enemies: Vec<Entity>) -> Self {
        let mut ranked: Vec<(i32, Combatant)> = vec![(player.initiative, Combatant::Player)];
        ranked.extend(
            enemies
                .iter()
                .enumerate()
                .map(|(i, e)| (e.initiative, Combatant::Enemy(i))),
        );
        // stable sort keeps insertion order on ties
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        let order = ranked.into_iter().map(|(_, c)| c).collect();

        let mut session = Self {
            enemies,
            order,
            current: 0,
            active: true,
            reported: BTreeSet::new(),
        };
        session.skip_defeated();
        info!(
            "combat started against {} enem{}",
            session.enemies.len(),
            if session.enemies.len() == 1 { "y" } else { "ies" }
        );
        session
    }

    /// Rebuild a session from saved parts
    pub fn resume(enemies: Vec<Entity>, order: Vec<Combatant>, current: usize) -> Self {
        let reported = enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_alive())
            .map(|(i, _)| i)
            .collect();
        let len = order.len().max(1);
        let mut session = Self {
            enemies,
            order,
            current: current % len,
            active: true,
            reported,
        };
        if session.all_defeated() {
            session.active = false;
        }
        session
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Entity] {
        &mut self.enemies
    }

    pub fn order(&self) -> &[Combatant] {
        &self.order
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_actor(&self) -> Option<Combatant> {
        self.order.get(self.current).copied()
    }

    pub fn is_player_turn(&self) -> bool {
        self.active && self.current_actor() == Some(Combatant::Player)
    }

    /// Display name of a combatant
    pub fn name_of<'a>(&'a self, combatant: Combatant, player: &'a Entity) -> &'a str {
        match combatant {
            Combatant::Player => &player.name,
            Combatant::Enemy(i) => self
                .enemies
                .get(i)
                .map(|e| e.name.as_str())
                .unwrap_or("someone"),
        }
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.enemies.iter().enumerate().filter(|(_, e)| e.is_alive())
    }

    pub fn first_living(&self) -> Option<usize> {
        self.living_enemies().map(|(i, _)| i).next()
    }

    pub fn all_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    /// Deactivate once no enemy is left standing
    pub fn check_victory(&mut self) -> bool {
        if !self.all_defeated() {
            return false;
        }
        if self.active {
            self.active = false;
            info!("combat won");
        }
        true
    }

    /// Pick the enemy a command refers to.
    ///
    /// With no query there must be exactly one living enemy. A query
    /// matches names exactly first, then by substring; several substring
    /// matches need disambiguation.
    pub fn select_target(&self, query: Option<&str>) -> Result<usize, String> {
        let living: Vec<(usize, &Entity)> = self.living_enemies().collect();
        let Some(query) = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty()) else {
            return match living.as_slice() {
                [] => Err("There is nothing left to attack.".to_string()),
                [(i, _)] => Ok(*i),
                _ => Err("Attack which enemy?".to_string()),
            };
        };

        if let Some((i, _)) = living.iter().find(|(_, e)| e.name.to_lowercase() == query) {
            return Ok(*i);
        }
        let partial: Vec<&(usize, &Entity)> = living
            .iter()
            .filter(|(_, e)| e.name.to_lowercase().contains(&query))
            .collect();
        match partial.as_slice() {
            [] => Err(format!("There is no {} here.", query)),
            [(i, _)] => Ok(*i),
            many => {
                let names: Vec<&str> = many.iter().map(|(_, e)| e.name.as_str()).collect();
                Err(format!("Which {} do you mean: {}?", query, names.join(", ")))
            }
        }
    }

    /// The player's basic attack. Does not end the player's turn.
    pub fn player_attack(&mut self, player: &Entity, target: usize) -> String {
        let Some(enemy) = self.enemies.get_mut(target) else {
            return "There is nothing there to attack.".to_string();
        };
        let result = resolve_attack(player, enemy);
        let mut message = format!(
            "You hit the {} for {} damage.",
            enemy.name, result.amount
        );
        if result.killed {
            message.push_str(&format!(" The {} is defeated!", enemy.name));
        }
        self.check_victory();
        message
    }

    /// Try to escape; success ends the session
    pub fn attempt_flee<R: Rng + ?Sized>(&mut self, chance: f64, rng: &mut R) -> bool {
        let escaped = rng.random_bool(chance.clamp(0.0, 1.0));
        if escaped {
            self.active = false;
            info!("player fled combat");
        }
        escaped
    }

    /// Pass the turn to the next combatant still standing
    pub fn advance(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.order.len();
        self.skip_defeated();
    }

    fn skip_defeated(&mut self) {
        for _ in 0..self.order.len() {
            let actor = self.order[self.current];
            match actor {
                Combatant::Enemy(i) if !self.enemies.get(i).is_some_and(Entity::is_alive) => {
                    self.current = (self.current + 1) % self.order.len();
                }
                _ => return,
            }
        }
    }

    /// Let every enemy up to the player's slot act
    pub fn run_enemy_turns(&mut self, player: &mut Entity) -> EnemyPhase {
        let mut phase = EnemyPhase::default();
        for _ in 0..self.order.len() {
            if !self.active {
                break;
            }
            let Some(Combatant::Enemy(i)) = self.current_actor() else {
                break;
            };
            let enemy = &self.enemies[i];
            if enemy.is_alive() {
                if enemy.can_act() {
                    let result = resolve_attack(enemy, player);
                    debug!("{} hits {} for {}", enemy.name, player.name, result.amount);
                    phase.messages.push(format!(
                        "The {} hits you for {} damage.",
                        enemy.name, result.amount
                    ));
                    if !player.is_alive() {
                        phase.player_defeated = true;
                        self.active = false;
                        break;
                    }
                } else {
                    phase
                        .messages
                        .push(format!("The {} is stunned and cannot act.", enemy.name));
                }
            }
            self.advance();
        }
        phase
    }

    /// Enemies defeated since the last call
    pub fn take_new_defeats(&mut self) -> Vec<usize> {
        let fresh: Vec<usize> = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| !e.is_alive() && !self.reported.contains(i))
            .map(|(i, _)| i)
            .collect();
        self.reported.extend(fresh.iter().copied());
        fresh
    }

    /// End the encounter, handing back the enemies still standing
    pub fn end(self) -> Vec<Entity> {
        self.enemies.into_iter().filter(|e| e.is_alive()).collect()
    }
}
