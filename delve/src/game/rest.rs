//! Rest mode: paying for a night at an inn

use rand::Rng;
use tracing::info;

use super::{Game, GameMode, TransitionContext};
use crate::commands::{Command, Verb};
use crate::history::Color;

const DEFAULT_REST_LINE: &str = "You sleep soundly and wake refreshed.";

pub(super) fn enter(game: &mut Game) -> String {
    let Some(inn) = game.room().and_then(|room| room.inn.clone()) else {
        return "There is no inn here.".to_string();
    };
    game.transition_to(GameMode::Rest, TransitionContext::default());
    format!(
        "A bed for the night costs {} coins. Rest here? (yes/no)",
        inn.cost
    )
}

pub(super) fn update(_game: &mut Game) {}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb {
        Some(Verb::Yes | Verb::Rest) => confirm(game),
        Some(Verb::No | Verb::Back) => {
            game.transition_to(GameMode::Exploration, TransitionContext::default());
            "You decide not to rest.".to_string()
        }
        Some(Verb::Status) => game.status_text(),
        _ => "Rest here? (yes/no)".to_string(),
    };
    Some(reply)
}

fn confirm(game: &mut Game) -> String {
    let Some(inn) = game.room().and_then(|room| room.inn.clone()) else {
        game.transition_to(GameMode::Exploration, TransitionContext::default());
        return "There is no inn here.".to_string();
    };
    if game.player.coins < inn.cost {
        return format!(
            "You need {} coins to rest, but you only have {}.",
            inn.cost, game.player.coins
        );
    }

    game.player.coins -= inn.cost;
    game.player.entity.restore_full();
    info!("rested for {} coins", inn.cost);

    let line = match inn.lines.len() {
        0 => DEFAULT_REST_LINE.to_string(),
        n => inn.lines[game.rng.random_range(0..n)].clone(),
    };
    game.log(line, Some(Color::Cyan));
    game.transition_to(GameMode::Exploration, TransitionContext::default());
    format!(
        "You rest and recover fully. ({} coins paid, {} left)",
        inn.cost, game.player.coins
    )
}
