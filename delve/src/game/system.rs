//! Title, menu and game over screens

use tracing::warn;

use super::{Game, GameMode, TransitionContext};
use crate::commands::{Command, Verb};

const TITLE_TEXT: &str =
    "Welcome to Delve. Type 'start' to begin, 'load' to continue a saved game, or 'quit'.";
const MENU_TEXT: &str = "Game paused. (save, load, resume, quit)";
const GAME_OVER_TEXT: &str = "Your adventure is over. Type 'restart' or 'quit'.";

pub(super) fn title_update(_game: &mut Game) {}

pub(super) fn menu_update(_game: &mut Game) {}

pub(super) fn game_over_update(_game: &mut Game) {}

fn quit(game: &mut Game) -> String {
    game.quit = true;
    "Farewell.".to_string()
}

fn load(game: &mut Game) -> String {
    match game.load_game() {
        Ok(()) => format!("Game loaded.\n{}", game.describe_room()),
        Err(err) => {
            warn!("load failed: {}", err);
            format!("Could not load the game: {}", err)
        }
    }
}

pub(super) fn title_command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb? {
        Verb::Start => {
            game.transition_to(GameMode::Exploration, TransitionContext::default());
            game.describe_room()
        }
        Verb::Load => load(game),
        Verb::Quit => quit(game),
        Verb::Look => TITLE_TEXT.to_string(),
        _ => return None,
    };
    Some(reply)
}

pub(super) fn menu_command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb? {
        Verb::Save => match game.save_game() {
            Ok(()) => format!("Game saved to {}.", game.rules.save_path.display()),
            Err(err) => {
                warn!("save failed: {}", err);
                format!("Could not save the game: {}", err)
            }
        },
        Verb::Load => load(game),
        Verb::Back | Verb::Menu => {
            game.return_to_previous();
            "Resuming.".to_string()
        }
        Verb::Look => MENU_TEXT.to_string(),
        Verb::Quit => quit(game),
        _ => return None,
    };
    Some(reply)
}

/// Only `restart` and `quit` mean anything once the player has fallen
pub(super) fn game_over_command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb {
        Some(Verb::Restart) => game.restart(),
        Some(Verb::Quit) => quit(game),
        _ => GAME_OVER_TEXT.to_string(),
    };
    Some(reply)
}
