//! Dialogue mode: stepping through an NPC's lines

use super::{Game, GameMode, TransitionContext};
use crate::commands::{Command, Verb};

/// Who is talking and which line is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DialogueState {
    pub npc: usize,
    pub line: usize,
}

pub(super) fn begin(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Talk to whom?".to_string();
    };
    let Some(room) = game.room() else {
        return super::NOWHERE.to_string();
    };
    let Some(index) = room.find_npc(&query) else {
        return format!("There is no one called {} here.", query);
    };
    let npc = &room.npcs[index];
    let Some(first) = npc.lines.first() else {
        return format!("{} has nothing to say.", npc.name);
    };
    let reply = format!("{}: \"{}\"", npc.name, first);

    game.dialogue = Some(DialogueState {
        npc: index,
        line: 0,
    });
    game.transition_to(GameMode::Dialogue, TransitionContext::npc(index));
    reply
}

pub(super) fn update(game: &mut Game) {
    if game.dialogue.is_some() {
        return;
    }
    match game.context.npc {
        Some(npc) => game.dialogue = Some(DialogueState { npc, line: 0 }),
        None => game.return_to_previous(),
    }
}

fn current_line(game: &Game) -> Option<(String, Option<String>)> {
    let state = game.dialogue?;
    let npc = game.room()?.npcs.get(state.npc)?;
    Some((npc.name.clone(), npc.lines.get(state.line).cloned()))
}

fn finish(game: &mut Game, message: String) -> String {
    game.dialogue = None;
    game.return_to_previous();
    message
}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let Some((name, line)) = current_line(game) else {
        return Some(finish(game, "There is no one to talk to.".to_string()));
    };
    let reply = match cmd.verb? {
        Verb::Next | Verb::Talk | Verb::Yes => {
            if let Some(state) = game.dialogue.as_mut() {
                state.line += 1;
            }
            match current_line(game).and_then(|(_, line)| line) {
                Some(next) => format!("{}: \"{}\"", name, next),
                None => finish(game, format!("{} has nothing more to say.", name)),
            }
        }
        Verb::Look => match line {
            Some(line) => format!("{}: \"{}\"", name, line),
            None => format!("{} is silent.", name),
        },
        Verb::Back | Verb::No => finish(game, format!("You say goodbye to {}.", name)),
        _ => return None,
    };
    Some(reply)
}
