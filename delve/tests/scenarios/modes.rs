//! Mode state machine scenarios

use crate::harness::TestGame;
use delve::{GameMode, TransitionContext};

/// Test: the game opens on the title screen and `start` goes exploring
#[test]
fn test_title_then_start() {
    let mut game = TestGame::new();
    assert_eq!(game.mode(), GameMode::Title);

    let reply = game.send("start");
    assert!(reply.contains("Village Square"), "{}", reply);
    assert_eq!(game.mode(), GameMode::Exploration);
    assert_eq!(game.previous_mode(), Some(GameMode::Title));
    assert!(game.logged("Entering Exploration mode"));
}

/// Test: entering the current mode again has no side effects
#[test]
fn test_reentering_mode_is_noop() {
    let mut game = TestGame::started();
    game.transition_to(GameMode::Inventory, TransitionContext::default());
    let runs = game.handler_runs();
    let lines = game.history().len();

    game.transition_to(GameMode::Inventory, TransitionContext::default());
    assert_eq!(game.handler_runs(), runs);
    assert_eq!(game.history().len(), lines);
    assert_eq!(game.previous_mode(), Some(GameMode::Exploration));
    assert_eq!(game.logged_count("Entering Inventory mode"), 1);
}

/// Test: inventory opens over exploration and `back` returns to it
#[test]
fn test_inventory_returns_to_exploration() {
    let mut game = TestGame::started();
    let listing = game.send("i");
    assert_eq!(game.mode(), GameMode::Inventory);
    assert!(listing.contains("Coins: 10"), "{}", listing);
    assert!(listing.contains("Healing Potion x2"), "{}", listing);

    let reply = game.send("close");
    assert_eq!(reply, "You close your pack.");
    assert_eq!(game.mode(), GameMode::Exploration);
    assert_eq!(game.previous_mode(), Some(GameMode::Inventory));
}

/// Test: the menu pauses and resumes without losing the previous mode
#[test]
fn test_menu_resume() {
    let mut game = TestGame::started();
    game.send("menu");
    assert_eq!(game.mode(), GameMode::Menu);

    let reply = game.send("resume");
    assert_eq!(reply, "Resuming.");
    assert_eq!(game.mode(), GameMode::Exploration);
}

/// Test: named transitions reject unknown modes
#[test]
fn test_named_transition() {
    let mut game = TestGame::started();
    assert!(game.transition_to_named("dancing").is_err());
    assert_eq!(game.mode(), GameMode::Exploration);

    game.transition_to_named("Inventory").expect("known mode");
    assert_eq!(game.mode(), GameMode::Inventory);
}

/// Test: help is answered per mode and unknown words fall through
#[test]
fn test_help_and_unknown_input() {
    let mut game = TestGame::started();
    let help = game.send("help");
    assert!(help.starts_with("Exploration commands:"), "{}", help);
    assert!(help.contains("go <direction>"));

    assert_eq!(game.send("dance wildly"), "I don't understand that.");
    assert_eq!(game.game.process_command("   "), None);
}

/// Test: quit is honored from exploration
#[test]
fn test_quit() {
    let mut game = TestGame::started();
    assert!(!game.quit_requested());
    assert_eq!(game.send("quit"), "Farewell.");
    assert!(game.quit_requested());
}
