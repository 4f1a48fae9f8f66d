//! Combat scenarios
//!
//! The hero has attack 10, defense 5 and acts first against the demo wolves.

use crate::harness::{arena, TestGame};
use delve::combat::{EffectKind, StatusEffect};
use delve::entity::Entity;
use delve::game::Rules;
use delve::GameMode;

fn enemy_health(game: &TestGame) -> Vec<i32> {
    game.combat()
        .map(|session| session.enemies().iter().map(|e| e.health).collect())
        .unwrap_or_default()
}

/// Test: attack 10 against defense 3 deals 7
#[test]
fn test_attack_deals_attack_minus_defense() {
    let mut game = arena(Entity::new("Training Dummy", 20, 0, 3));
    assert_eq!(game.send("attack dummy"), "You engage the Training Dummy!");
    assert_eq!(game.mode(), GameMode::Combat);

    let reply = game.send("attack");
    assert_eq!(reply, "You hit the Training Dummy for 7 damage.");
    assert_eq!(enemy_health(&game), vec![13]);
}

/// Test: a zero-attack enemy still lands one point per turn
#[test]
fn test_minimum_damage() {
    let mut game = arena(Entity::new("Training Dummy", 20, 0, 3));
    game.run(&["attack dummy", "attack"]);
    assert!(game.logged("The Training Dummy hits you for 1 damage."));
    assert_eq!(game.player().entity.health, 29);
}

/// Test: a stunned hero loses the turn instead of attacking
#[test]
fn test_stunned_player_cannot_attack() {
    let mut game = arena(Entity::new("Training Dummy", 50, 0, 3));
    game.send("attack dummy");
    let now = game.now();
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::new("stun", EffectKind::Stun, 1, 60.0, now), now);

    assert_eq!(game.send("attack"), "You are stunned and cannot act.");
    assert_eq!(enemy_health(&game), vec![50]);
    assert!(game.logged("The Training Dummy hits you for 1 damage."));

    assert_eq!(game.send("use potion"), "You are stunned and cannot act.");
    assert_eq!(game.player().inventory.count("healing-potion"), 2);
    assert_eq!(game.send("flee"), "You are stunned and cannot act.");
    assert_eq!(game.mode(), GameMode::Combat);
}

/// Test: a fire bomb hits every living enemy and is used up
#[test]
fn test_fire_bomb_hits_all_enemies() {
    let mut game = TestGame::started();
    game.player_mut().inventory.add("fire-bomb", 2);
    game.run(&["north", "attack grey"]);

    let reply = game.send("use fire bomb");
    assert!(
        reply.starts_with("The Fire Bomb bursts, dealing 8 damage to every enemy."),
        "{}",
        reply
    );
    assert_eq!(enemy_health(&game), vec![6, 2]);
    assert_eq!(game.player().inventory.count("fire-bomb"), 1);
    assert!(game.logged("hits you for"));
}

/// Test: defeating the last enemy with an item wins the fight
#[test]
fn test_victory_by_item() {
    let mut game = arena(Entity::new("Rat", 8, 2, 0));
    game.player_mut().inventory.add("fire-bomb", 1);
    game.send("attack rat");

    let reply = game.send("use bomb");
    assert!(reply.starts_with("The Fire Bomb bursts"), "{}", reply);
    assert!(reply.contains("Victory! All enemies are defeated."), "{}", reply);
    assert_eq!(game.mode(), GameMode::Exploration);
    assert!(game.combat().is_none());
    assert!(!game.player().inventory.contains("fire-bomb"));
    assert_eq!(game.player().entity.health, 30);
}

/// Test: a potion in combat heals, is consumed and passes the turn
#[test]
fn test_potion_in_combat() {
    let mut game = arena(Entity::new("Training Dummy", 50, 0, 3));
    game.send("attack dummy");
    game.player_mut().entity.health = 10;

    assert_eq!(
        game.send("use potion"),
        "You use the Healing Potion and recover 15 health."
    );
    assert_eq!(game.player().inventory.count("healing-potion"), 1);
    assert!(game.logged("The Training Dummy hits you for 1 damage."));
    assert_eq!(game.player().entity.health, 24);
    assert_eq!(enemy_health(&game), vec![50]);
}

/// Test: an item that fails keeps the turn and the item
#[test]
fn test_failed_item_keeps_turn() {
    let mut game = arena(Entity::new("Training Dummy", 50, 0, 3));
    game.send("attack dummy");

    assert_eq!(game.send("use potion"), "You are already at full health.");
    assert_eq!(game.player().inventory.count("healing-potion"), 2);
    assert!(!game.logged("hits you for"));
    assert!(game.send("look").contains("It is your turn."));
}

/// Test: two enemies and no target asks which, changing nothing
#[test]
fn test_attack_needs_target_with_two_enemies() {
    let mut game = TestGame::started();
    game.send("north");
    game.send("attack wolf");
    assert_eq!(game.mode(), GameMode::Combat);
    let before = enemy_health(&game);

    assert_eq!(game.send("attack"), "Attack which enemy?");
    assert_eq!(enemy_health(&game), before);
    assert_eq!(game.player().entity.health, 30);

    let reply = game.send("attack wolf");
    assert_eq!(reply, "Which wolf do you mean: Grey Wolf, Young Wolf?");
    assert_eq!(enemy_health(&game), before);
}

/// Test: fight both wolves to victory and collect experience
#[test]
fn test_victory_returns_to_exploration() {
    let mut game = TestGame::started();
    game.run(&["north", "attack young wolf"]);

    let reply = game.send("attack young");
    assert!(
        reply.starts_with("You hit the Young Wolf for 10 damage. The Young Wolf is defeated!"),
        "{}",
        reply
    );
    assert!(reply.contains("You gain 20 experience."), "{}", reply);

    let mut replies = Vec::new();
    for _ in 0..10 {
        if !game.is_in_state(GameMode::Combat) {
            break;
        }
        replies.push(game.send("attack grey"));
    }
    assert_eq!(game.mode(), GameMode::Exploration);
    let last = replies.last().expect("at least one attack");
    assert!(last.contains("You gain 30 experience."), "{}", last);
    assert!(last.contains("Victory! All enemies are defeated."), "{}", last);
    assert_eq!(game.player().entity.experience, 50);

    let forest = game.world().room("forest").expect("forest");
    assert_eq!(forest.living_enemies().count(), 0);
}

/// Test: fleeing puts the surviving enemies back in the room
#[test]
fn test_flee_returns_survivors() {
    let mut game = TestGame::with_rules(Rules {
        flee_chance: 1.0,
        ..Rules::default()
    });
    game.run(&["start", "north", "attack grey"]);
    game.send("attack grey");

    assert_eq!(game.send("flee"), "You flee from the fight!");
    assert_eq!(game.mode(), GameMode::Exploration);
    assert!(game.combat().is_none());

    let forest = game.world().room("forest").expect("forest");
    assert_eq!(forest.living_enemies().count(), 2);
    let grey = forest
        .enemies
        .iter()
        .find(|e| e.name == "Grey Wolf")
        .expect("grey wolf");
    assert_eq!(grey.health, 14 - 9);
}

/// Test: a failed flee costs the turn
#[test]
fn test_failed_flee() {
    let mut game = TestGame::with_rules(Rules {
        flee_chance: 0.0,
        ..Rules::default()
    });
    game.run(&["start", "north", "attack grey"]);
    assert_eq!(
        game.send("flee"),
        "You try to flee, but the way is blocked!"
    );
    assert_eq!(game.mode(), GameMode::Combat);
    assert!(game.player().entity.health < 30);
}

/// Test: skills go on cooldown
#[test]
fn test_skill_cooldown() {
    let mut game = TestGame::started();
    game.run(&["north", "attack grey"]);

    let first = game.send("skill firebolt");
    assert!(!first.is_empty());
    assert!(enemy_health(&game)[0] < 14);

    let again = game.send("skill firebolt");
    assert!(again.contains("not ready yet"), "{}", again);

    game.clock.advance(6.0);
    let later = game.send("skill fire");
    assert!(!later.contains("not ready yet"), "{}", later);
}

/// Test: commands outside the combat set are rejected with usage
#[test]
fn test_combat_rejects_other_commands() {
    let mut game = TestGame::started();
    game.run(&["north", "attack grey"]);
    let reply = game.send("take key");
    assert!(reply.starts_with("You can't do that in combat. Try: attack"), "{}", reply);
    assert_eq!(game.mode(), GameMode::Combat);

    let status = game.send("look");
    assert!(status.contains("Grey Wolf"), "{}", status);
    assert!(status.contains("Hero (you)"), "{}", status);
    assert!(status.contains("It is your turn."), "{}", status);
}

/// Test: the ghoul ambushes, and falling ends the adventure until restart
#[test]
fn test_ambush_defeat_and_restart() {
    let mut game = TestGame::started();
    game.run(&["north", "north", "take rusty key", "unlock down"]);
    game.player_mut().entity.health = 1;

    game.send("down");
    assert!(game.logged("You are ambushed!"));
    assert_eq!(game.mode(), GameMode::Combat);

    game.send("attack");
    assert_eq!(game.mode(), GameMode::GameOver);
    assert!(game.logged("You have been defeated."));
    assert!(game.combat().is_none());
    assert_eq!(
        game.send("north"),
        "Your adventure is over. Type 'restart' or 'quit'."
    );

    let reply = game.send("restart");
    assert!(reply.starts_with("You awaken once more."), "{}", reply);
    assert!(reply.contains("Village Square"), "{}", reply);
    assert_eq!(game.mode(), GameMode::Exploration);
    assert_eq!(game.player().entity.health, 30);
    assert!(!game.player().inventory.contains("rusty-key"));
    let clearing = game.world().room("clearing").expect("clearing");
    assert!(clearing.items.contains("rusty-key"));
}
