//! Exploration scenarios

use crate::harness::TestGame;
use delve::GameMode;

/// Test: walk north into the forest and back by shorthand
#[test]
fn test_movement() {
    let mut game = TestGame::started();
    let reply = game.send("go north");
    assert!(reply.contains("Dark Forest"), "{}", reply);
    assert!(reply.contains("Enemies: Grey Wolf, Young Wolf"), "{}", reply);
    assert_eq!(game.world().current_room_id(), "forest");

    let reply = game.send("s");
    assert!(reply.contains("Village Square"), "{}", reply);

    assert_eq!(game.send("go up"), "You can't go that way.");
    assert_eq!(game.world().current_room_id(), "square");
}

/// Test: taking a stack and dropping one back
#[test]
fn test_take_and_drop() {
    let mut game = TestGame::started();
    assert_eq!(game.send("take the bread"), "You take the Bread (x2).");
    assert_eq!(game.player().inventory.count("bread"), 2);

    assert_eq!(game.send("drop bread"), "You drop the Bread.");
    assert_eq!(game.player().inventory.count("bread"), 1);
    let square = game.world().room("square").expect("square");
    assert_eq!(square.items.count("bread"), 1);

    assert_eq!(game.send("take lantern"), "There is no lantern here.");
}

/// Test: a locked exit needs its key; a reusable key stays in the pack
#[test]
fn test_locked_exit() {
    let mut game = TestGame::started();
    game.run(&["north", "north"]);
    assert_eq!(game.send("down"), "The way down is locked.");
    assert_eq!(
        game.send("unlock down"),
        "You need the Rusty Key to unlock the way down."
    );

    game.send("take rusty key");
    assert_eq!(
        game.send("unlock down"),
        "You unlock the way down with the Rusty Key."
    );
    assert!(game.player().inventory.contains("rusty-key"));
}

/// Test: opening the chest spends the single-use key and pays out
#[test]
fn test_open_chest() {
    let mut game = TestGame::started();
    game.run(&["north", "take key", "north"]);
    assert!(game.player().inventory.contains("small-key"));

    let coins = game.player().coins;
    let reply = game.send("open chest");
    assert!(reply.starts_with("You open the Old Chest and find"), "{}", reply);
    assert!(game.player().coins > coins);
    assert!(!game.player().inventory.contains("small-key"));
    let clearing = game.world().room("clearing").expect("clearing");
    assert!(!clearing.items.contains("old-chest"));
}

/// Test: a chest cannot be opened without its key
#[test]
fn test_open_chest_without_key() {
    let mut game = TestGame::started();
    game.run(&["north", "north"]);
    assert_eq!(
        game.send("open chest"),
        "The Old Chest is locked; you need the Small Key."
    );
    assert!(game.world().room("clearing").expect("clearing").items.contains("old-chest"));
}

/// Test: equipping gear changes effective attack
#[test]
fn test_equip_weapon() {
    let mut game = TestGame::started();
    game.player_mut().inventory.add("iron-sword", 1);
    let attack = game.player().entity.effective_attack();

    game.send("equip sword");
    assert_eq!(game.player().entity.effective_attack(), attack + 3);
    assert!(!game.player().inventory.contains("iron-sword"));

    game.send("unequip weapon");
    assert_eq!(game.player().entity.effective_attack(), attack);
    assert!(game.player().inventory.contains("iron-sword"));
}

/// Test: using a potion heals and uses it up
#[test]
fn test_use_potion() {
    let mut game = TestGame::started();
    game.player_mut().entity.health = 10;
    game.send("use potion");
    assert_eq!(game.player().entity.health, 25);
    assert_eq!(game.player().inventory.count("healing-potion"), 1);
    assert_eq!(game.mode(), GameMode::Exploration);
}
