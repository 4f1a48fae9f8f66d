//! Combat mode
//!
//! Entering the mode (and every tick after) drives the session: enemy
//! effects tick, defeats pay out, and enemies act until it is the
//! player's turn again. Player actions come in through commands and end
//! the player's turn.

use tracing::info;

use super::{Game, GameMode, TransitionContext};
use crate::combat::{CombatSession, Combatant, SkillContext};
use crate::commands::{Command, Verb};
use crate::entity::Entity;
use crate::history::Color;

pub(super) const USAGE: &str =
    "attack [target], use <item>, skill <name>, flee, look, inventory, status";

const SEGMENTS: usize = 10;

/// Fixed-width bar, one `#` per tenth of health
pub fn health_bar(fraction: f64) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * SEGMENTS as f64).floor() as usize).min(SEGMENTS);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(SEGMENTS - filled))
}

pub(super) fn update(game: &mut Game) {
    if game.combat.is_none() && !begin(game) {
        return;
    }
    let now = game.now();

    let mut lines = Vec::new();
    if let Some(session) = game.combat.as_mut() {
        for enemy in session.enemies_mut() {
            lines.extend(enemy.update_effects(now));
        }
    }
    lines.extend(settle(game));
    for line in lines {
        game.log(line, Some(Color::Yellow));
    }
    if !game.is_in_state(GameMode::Combat) {
        return;
    }

    let Some(session) = game.combat.as_mut() else {
        return;
    };
    let mut lines = Vec::new();
    if session.is_player_turn() && !game.player.entity.can_act() {
        lines.push("You are stunned and cannot act.".to_string());
        session.advance();
    }
    let defeated = if session.is_player_turn() {
        false
    } else {
        let phase = session.run_enemy_turns(&mut game.player.entity);
        lines.extend(phase.messages);
        phase.player_defeated
    };

    for line in lines {
        game.log(line, Some(Color::Red));
    }
    if defeated {
        game.defeat();
    }
}

/// Pull the enemies named in the transition context out of the room
fn begin(game: &mut Game) -> bool {
    let mut indices = std::mem::take(&mut game.context.enemies);
    indices.sort_unstable();
    indices.dedup();

    let mut enemies = Vec::new();
    if let Some(room) = game.world.current_room_mut() {
        for i in indices.into_iter().rev() {
            if room.enemies.get(i).is_some_and(Entity::is_alive) {
                enemies.push(room.enemies.remove(i));
            }
        }
    }
    enemies.reverse();

    if enemies.is_empty() {
        game.log("There is no one to fight.", None);
        game.transition_to(GameMode::Exploration, TransitionContext::default());
        return false;
    }
    game.combat = Some(CombatSession::start(&game.player.entity, enemies));
    true
}

/// Pay out fresh defeats and close the session on victory
fn settle(game: &mut Game) -> Vec<String> {
    let Some(session) = game.combat.as_mut() else {
        return Vec::new();
    };
    let defeated: Vec<Entity> = session
        .take_new_defeats()
        .into_iter()
        .map(|i| session.enemies()[i].clone())
        .collect();
    let victory = session.check_victory();

    let mut lines = Vec::new();
    for enemy in &defeated {
        lines.extend(game.reward(enemy));
    }
    if victory {
        info!("combat over, {} defeated", defeated.len());
        lines.push("Victory! All enemies are defeated.".to_string());
        game.finish_combat();
        game.transition_to(GameMode::Exploration, TransitionContext::default());
    }
    lines
}

/// Wrap up the player's action: payouts, then pass the turn
fn end_player_turn(game: &mut Game, mut lines: Vec<String>) -> String {
    lines.extend(settle(game));
    if let Some(session) = game.combat.as_mut().filter(|s| s.is_active()) {
        session.advance();
    }
    lines.join("\n")
}

/// Gate for player actions; a stunned player loses the turn instead
fn ready(game: &mut Game) -> Result<(), String> {
    let can_act = game.player.entity.can_act();
    match game.combat.as_mut() {
        Some(session) if session.is_active() && session.is_player_turn() && !can_act => {
            session.advance();
            Err("You are stunned and cannot act.".to_string())
        }
        Some(session) if session.is_active() && session.is_player_turn() => Ok(()),
        Some(session) if session.is_active() => Err("It is not your turn.".to_string()),
        _ => Err("You are not fighting anyone.".to_string()),
    }
}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let Some(verb) = cmd.verb else {
        return Some(format!("You can't do that in combat. Try: {}", USAGE));
    };
    let reply = match verb {
        Verb::Attack => attack(game, cmd),
        Verb::Use => use_item(game, cmd),
        Verb::Flee => flee(game),
        Verb::Skill => skill(game, cmd),
        Verb::Look => status_block(game),
        Verb::Inventory => game.player.inventory_listing(game.catalog.as_ref()),
        Verb::Status => game.status_text(),
        _ => format!("You can't do that in combat. Try: {}", USAGE),
    };
    Some(reply)
}

fn attack(game: &mut Game, cmd: &Command) -> String {
    if let Err(message) = ready(game) {
        return message;
    }
    let Some(session) = game.combat.as_mut() else {
        return "You are not fighting anyone.".to_string();
    };
    let target = match session.select_target(cmd.target().as_deref()) {
        Ok(target) => target,
        Err(message) => return message,
    };
    let line = session.player_attack(&game.player.entity, target);
    end_player_turn(game, vec![line])
}

fn use_item(game: &mut Game, cmd: &Command) -> String {
    if let Err(message) = ready(game) {
        return message;
    }
    let Some(query) = cmd.target() else {
        return "Use what?".to_string();
    };
    let used = game.use_item(&query);
    if !used.success {
        return used.message;
    }
    end_player_turn(game, vec![used.message])
}

fn flee(game: &mut Game) -> String {
    if let Err(message) = ready(game) {
        return message;
    }
    let chance = game.rules.flee_chance;
    let Some(session) = game.combat.as_mut() else {
        return "You are not fighting anyone.".to_string();
    };
    if session.attempt_flee(chance, &mut game.rng) {
        game.finish_combat();
        game.transition_to(GameMode::Exploration, TransitionContext::default());
        "You flee from the fight!".to_string()
    } else {
        session.advance();
        "You try to flee, but the way is blocked!".to_string()
    }
}

fn skill(game: &mut Game, cmd: &Command) -> String {
    if let Err(message) = ready(game) {
        return message;
    }
    let Some(name) = cmd.target() else {
        let known: Vec<&str> = game.skills.names().map(String::as_str).collect();
        if known.is_empty() {
            return "You don't know any skills.".to_string();
        }
        return format!("Use which skill? You know: {}", known.join(", "));
    };

    let now = game.now();
    let skill = match game.skills.check(&name, &game.player.entity, now) {
        Ok(skill) => skill,
        Err(message) => return message,
    };
    let Some(session) = game.combat.as_mut() else {
        return "You are not fighting anyone.".to_string();
    };
    let target = match skill.needs_target() {
        true => match session.first_living() {
            Some(i) => session.enemies_mut().get_mut(i),
            None => return "There is nothing to target.".to_string(),
        },
        false => None,
    };

    let mut ctx = SkillContext {
        user: &mut game.player.entity,
        now,
        rng: &mut game.rng,
    };
    let line = skill.activate(&mut ctx, target);
    game.skills.commit(skill.as_ref(), now);
    end_player_turn(game, vec![line])
}

/// Health bars for everyone still standing, and whose turn it is
pub(super) fn status_block(game: &Game) -> String {
    let Some(session) = game.combat.as_ref() else {
        return "You are not in combat.".to_string();
    };
    let player = &game.player.entity;
    let mut lines = vec!["-- Combat --".to_string()];
    for (_, enemy) in session.living_enemies() {
        lines.push(format!(
            "{:<16} {} {}/{}",
            enemy.name,
            health_bar(enemy.health_fraction()),
            enemy.health,
            enemy.max_health
        ));
    }
    lines.push(format!(
        "{:<16} {} {}/{}",
        format!("{} (you)", player.name),
        health_bar(player.health_fraction()),
        player.health,
        player.max_health
    ));

    let order: Vec<&str> = session
        .order()
        .iter()
        .map(|c| session.name_of(*c, player))
        .collect();
    lines.push(format!("Order: {}", order.join(" > ")));
    lines.push(match session.current_actor() {
        Some(Combatant::Player) => "It is your turn.".to_string(),
        Some(actor) => format!("It is the {}'s turn.", session.name_of(actor, player)),
        None => "No one is acting.".to_string(),
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_bar_segments() {
        assert_eq!(health_bar(1.0), "[##########]");
        assert_eq!(health_bar(0.0), "[----------]");
        assert_eq!(health_bar(0.55), "[#####-----]");
        assert_eq!(health_bar(0.99), "[#########-]");
        assert_eq!(health_bar(1.7), "[##########]");
    }
}
