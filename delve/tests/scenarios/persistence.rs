//! Save and load scenarios

use crate::harness::TestGame;
use delve::combat::StatusEffect;
use delve::game::Rules;
use delve::GameMode;
use tempfile::TempDir;

fn rules(dir: &TempDir) -> Rules {
    Rules {
        save_path: dir.path().join("save.json"),
        ..Rules::default()
    }
}

/// Test: save from the menu, load from a fresh title screen
#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().expect("tempdir");

    let mut game = TestGame::with_rules(rules(&dir));
    game.run(&["start", "take bread", "north"]);
    game.player_mut().entity.health = 17;
    game.send("menu");
    let reply = game.send("save");
    assert!(reply.starts_with("Game saved to"), "{}", reply);
    assert!(dir.path().join("save.json").exists());

    let mut fresh = TestGame::with_rules(rules(&dir));
    let reply = fresh.send("load");
    assert!(reply.starts_with("Game loaded."), "{}", reply);
    assert!(reply.contains("Dark Forest"), "{}", reply);
    assert_eq!(fresh.mode(), GameMode::Menu);
    assert_eq!(fresh.world().current_room_id(), "forest");
    assert_eq!(fresh.player().entity.health, 17);
    assert_eq!(fresh.player().inventory.count("bread"), 2);
    let square = fresh.world().room("square").expect("square");
    assert!(!square.items.contains("bread"));

    assert_eq!(fresh.send("resume"), "Resuming.");
    assert_eq!(fresh.mode(), GameMode::Exploration);
}

/// Test: effect timers resume with the time they had left
#[test]
fn test_effects_survive_save() {
    let dir = TempDir::new().expect("tempdir");

    let mut game = TestGame::with_rules(rules(&dir));
    game.send("start");
    game.player_mut()
        .entity
        .apply_effect(StatusEffect::poison(1, 1, 20.0, 5.0, 0.0), 0.0);
    game.clock.set(8.0);
    game.save_game().expect("save");

    let mut fresh = TestGame::with_rules(rules(&dir));
    fresh.clock.set(100.0);
    fresh.load_game().expect("load");
    let poison = fresh.player().entity.effects().get("poison").expect("poison");
    assert!((poison.remaining(100.0) - 12.0).abs() < 1e-6);
}

/// Test: a combat in progress comes back mid-fight
#[test]
fn test_combat_survives_save() {
    let dir = TempDir::new().expect("tempdir");

    let mut game = TestGame::with_rules(rules(&dir));
    game.run(&["start", "north", "attack grey", "attack grey"]);
    game.save_game().expect("save");

    let mut fresh = TestGame::with_rules(rules(&dir));
    fresh.load_game().expect("load");
    assert_eq!(fresh.mode(), GameMode::Combat);
    let session = fresh.combat().expect("combat session");
    assert_eq!(session.enemies().len(), 2);
    assert_eq!(session.enemies()[0].health, 5);
    assert!(session.is_player_turn());
}

/// Test: loading with no save file reports the problem
#[test]
fn test_load_missing_save() {
    let dir = TempDir::new().expect("tempdir");
    let mut game = TestGame::with_rules(rules(&dir));
    let reply = game.send("load");
    assert!(reply.starts_with("Could not load the game"), "{}", reply);
    assert_eq!(game.mode(), GameMode::Title);
}
