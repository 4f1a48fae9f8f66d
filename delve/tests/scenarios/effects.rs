//! Status effect scenarios on the manual clock

use crate::harness::TestGame;
use delve::combat::StatusEffect;
use delve::GameMode;

/// Test: the same poison twice leaves one unchanged effect
#[test]
fn test_duplicate_poison_is_rejected() {
    let mut game = TestGame::started();
    let now = game.now();
    let first = game
        .player_mut()
        .entity
        .apply_effect(StatusEffect::poison(2, 2, 30.0, 5.0, now), now);
    assert!(first.applied);

    let second = game
        .player_mut()
        .entity
        .apply_effect(StatusEffect::poison(2, 2, 30.0, 5.0, now), now);
    assert!(!second.applied);

    let effects = game.player().entity.effects();
    assert_eq!(effects.len(), 1);
    let poison = effects.get("poison").expect("poison");
    assert_eq!(poison.strength, 2);
    assert_eq!(poison.duration, 30.0);
    assert_eq!(poison.start, now);
}

/// Test: poison bites every tick but reports at most every ten seconds
#[test]
fn test_poison_ticks_and_throttles_reports() {
    let mut game = TestGame::started();
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 2, 30.0, 5.0, 0.0), 0.0);

    game.wait(2.0);
    assert_eq!(game.player().entity.health, 30);

    game.wait(3.0);
    assert_eq!(game.player().entity.health, 28);
    assert_eq!(game.logged_count("Hero takes 2 poison damage."), 1);

    game.wait(5.0);
    assert_eq!(game.player().entity.health, 26);
    assert_eq!(game.logged_count("Hero takes 2 poison damage."), 1);

    game.wait(5.0);
    assert_eq!(game.player().entity.health, 24);
    assert_eq!(game.logged_count("Hero takes 2 poison damage."), 2);
}

/// Test: effects run out and an antidote cures early
#[test]
fn test_expiry_and_cure() {
    let mut game = TestGame::started();
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 1, 4.0, 10.0, 0.0), 0.0);
    game.wait(4.0);
    assert!(!game.player().entity.effects().has("poison"));
    assert!(game.logged("Hero is no longer poisoned."));

    let now = game.now();
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 1, 30.0, 10.0, now), now);
    game.player_mut().inventory.add("antidote", 1);
    game.send("use antidote");
    assert!(!game.player().entity.effects().has("poison"));
    assert!(!game.player().inventory.contains("antidote"));
}

/// Test: lethal poison ends the game on the next tick
#[test]
fn test_poison_can_kill() {
    let mut game = TestGame::started();
    game.player_mut().entity.health = 2;
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 5, 30.0, 1.0, 0.0), 0.0);
    game.wait(1.0);
    assert_eq!(game.mode(), GameMode::GameOver);
    assert!(game.logged("You have been defeated."));
}

/// Test: time does not hurt the player on the title screen
#[test]
fn test_no_ticks_outside_live_modes() {
    let mut game = TestGame::new();
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 2, 30.0, 1.0, 0.0), 0.0);
    game.wait(5.0);
    assert_eq!(game.player().entity.health, 30);
    assert_eq!(game.mode(), GameMode::Title);
}
