//! Village scenarios: the outfitters, the inn and Old Mara

use crate::harness::TestGame;
use delve::GameMode;

/// Test: resting with exactly the price succeeds and heals fully
#[test]
fn test_rest_with_exact_coins() {
    let mut game = TestGame::started();
    game.send("east");
    game.player_mut().coins = 5;
    game.player_mut().entity.health = 4;

    let prompt = game.send("rest");
    assert_eq!(prompt, "A bed for the night costs 5 coins. Rest here? (yes/no)");
    assert_eq!(game.mode(), GameMode::Rest);

    let reply = game.send("yes");
    assert_eq!(reply, "You rest and recover fully. (5 coins paid, 0 left)");
    assert_eq!(game.player().coins, 0);
    assert_eq!(game.player().entity.health, 30);
    assert_eq!(game.mode(), GameMode::Exploration);
    assert!(game.logged("The innkeeper hums an old tune as you drift off."));
}

/// Test: one coin short quotes both amounts and changes nothing
#[test]
fn test_rest_one_coin_short() {
    let mut game = TestGame::started();
    game.send("e");
    game.player_mut().coins = 4;
    game.player_mut().entity.health = 4;

    game.send("rest");
    let reply = game.send("yes");
    assert_eq!(reply, "You need 5 coins to rest, but you only have 4.");
    assert_eq!(game.player().coins, 4);
    assert_eq!(game.player().entity.health, 4);
    assert_eq!(game.mode(), GameMode::Rest);

    assert_eq!(game.send("no"), "You decide not to rest.");
    assert_eq!(game.mode(), GameMode::Exploration);
}

/// Test: no inn, no rest
#[test]
fn test_rest_needs_inn() {
    let mut game = TestGame::started();
    assert_eq!(game.send("rest"), "There is no inn here.");
    assert_eq!(game.mode(), GameMode::Exploration);
}

/// Test: buying and selling at the outfitters
#[test]
fn test_shop_buy_and_sell() {
    let mut game = TestGame::started();
    game.send("west");
    let listing = game.send("shop");
    assert_eq!(game.mode(), GameMode::Shop);
    assert!(listing.starts_with("Hilda sells:"), "{}", listing);
    assert!(listing.contains("Healing Potion - 12 coins"), "{}", listing);
    assert!(listing.ends_with("You have 10 coins."), "{}", listing);

    assert_eq!(
        game.send("buy potion"),
        "You need 12 coins to buy the Healing Potion, but you only have 10."
    );
    assert_eq!(
        game.send("sell potion"),
        "You sell the Healing Potion for 5 coins."
    );
    assert_eq!(game.player().coins, 15);
    assert_eq!(
        game.send("buy healing potion"),
        "You buy the Healing Potion for 12 coins."
    );
    assert_eq!(game.player().coins, 3);
    assert_eq!(game.player().inventory.count("healing-potion"), 2);
    assert_eq!(game.send("buy dragon"), "Hilda doesn't sell any dragon.");

    assert_eq!(game.send("leave"), "You leave the shop.");
    assert_eq!(game.mode(), GameMode::Exploration);
}

/// Test: talking through every line returns to exploring
#[test]
fn test_dialogue_runs_out() {
    let mut game = TestGame::started();
    let first = game.send("talk to mara");
    assert_eq!(
        first,
        "Old Mara: \"The forest to the north has grown dangerous.\""
    );
    assert_eq!(game.mode(), GameMode::Dialogue);

    let second = game.send("next");
    assert!(second.contains("Wolves, they say."), "{}", second);
    game.send("next");
    assert_eq!(game.send("next"), "Old Mara has nothing more to say.");
    assert_eq!(game.mode(), GameMode::Exploration);
}

/// Test: leaving a conversation early
#[test]
fn test_dialogue_goodbye() {
    let mut game = TestGame::started();
    game.send("talk mara");
    assert_eq!(game.send("bye"), "You say goodbye to Old Mara.");
    assert_eq!(game.mode(), GameMode::Exploration);
    assert_eq!(game.send("talk bob"), "There is no one called bob here.");
}
