//! Command tokenizer
//!
//! Free text becomes one canonical [`Verb`] plus its arguments. All
//! synonyms live in the tables below; mode handlers only ever see verbs.

use crate::catalog::EquipSlot;
use crate::world::Direction;

/// Canonical command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Look,
    Go,
    Take,
    Drop,
    Inventory,
    Examine,
    Attack,
    Use,
    Flee,
    Skill,
    Status,
    Equip,
    Unequip,
    Sort,
    Back,
    List,
    Buy,
    Sell,
    Rest,
    Yes,
    No,
    Talk,
    Next,
    Unlock,
    Open,
    Shop,
    Menu,
    Save,
    Load,
    Start,
    Restart,
    Quit,
    Help,
}

/// Word to verb, case-insensitive
const VERB_SYNONYMS: &[(&str, Verb)] = &[
    ("look", Verb::Look),
    ("l", Verb::Look),
    ("go", Verb::Go),
    ("move", Verb::Go),
    ("walk", Verb::Go),
    ("take", Verb::Take),
    ("get", Verb::Take),
    ("grab", Verb::Take),
    ("pick", Verb::Take),
    ("drop", Verb::Drop),
    ("discard", Verb::Drop),
    ("inventory", Verb::Inventory),
    ("inv", Verb::Inventory),
    ("i", Verb::Inventory),
    ("examine", Verb::Examine),
    ("x", Verb::Examine),
    ("inspect", Verb::Examine),
    ("attack", Verb::Attack),
    ("a", Verb::Attack),
    ("fight", Verb::Attack),
    ("hit", Verb::Attack),
    ("kill", Verb::Attack),
    ("use", Verb::Use),
    ("drink", Verb::Use),
    ("eat", Verb::Use),
    ("flee", Verb::Flee),
    ("run", Verb::Flee),
    ("escape", Verb::Flee),
    ("skill", Verb::Skill),
    ("cast", Verb::Skill),
    ("status", Verb::Status),
    ("stats", Verb::Status),
    ("equip", Verb::Equip),
    ("wear", Verb::Equip),
    ("wield", Verb::Equip),
    ("unequip", Verb::Unequip),
    ("remove", Verb::Unequip),
    ("sort", Verb::Sort),
    ("back", Verb::Back),
    ("exit", Verb::Back),
    ("close", Verb::Back),
    ("done", Verb::Back),
    ("leave", Verb::Back),
    ("bye", Verb::Back),
    ("resume", Verb::Back),
    ("list", Verb::List),
    ("wares", Verb::List),
    ("buy", Verb::Buy),
    ("purchase", Verb::Buy),
    ("sell", Verb::Sell),
    ("rest", Verb::Rest),
    ("sleep", Verb::Rest),
    ("yes", Verb::Yes),
    ("y", Verb::Yes),
    ("no", Verb::No),
    ("talk", Verb::Talk),
    ("speak", Verb::Talk),
    ("next", Verb::Next),
    ("continue", Verb::Next),
    ("unlock", Verb::Unlock),
    ("open", Verb::Open),
    ("shop", Verb::Shop),
    ("trade", Verb::Shop),
    ("menu", Verb::Menu),
    ("pause", Verb::Menu),
    ("save", Verb::Save),
    ("load", Verb::Load),
    ("start", Verb::Start),
    ("new", Verb::Start),
    ("restart", Verb::Restart),
    ("quit", Verb::Quit),
    ("q", Verb::Quit),
    ("help", Verb::Help),
    ("?", Verb::Help),
];

/// Equipment slot aliases
const SLOT_ALIASES: &[(&str, EquipSlot)] = &[
    ("head", EquipSlot::Head),
    ("helmet", EquipSlot::Head),
    ("chest", EquipSlot::Chest),
    ("armor", EquipSlot::Chest),
    ("hands", EquipSlot::Hands),
    ("gloves", EquipSlot::Hands),
    ("gauntlets", EquipSlot::Hands),
    ("legs", EquipSlot::Legs),
    ("leggings", EquipSlot::Legs),
    ("greaves", EquipSlot::Legs),
    ("feet", EquipSlot::Feet),
    ("boots", EquipSlot::Feet),
    ("shoes", EquipSlot::Feet),
    ("neck", EquipSlot::Neck),
    ("amulet", EquipSlot::Neck),
    ("necklace", EquipSlot::Neck),
    ("pendant", EquipSlot::Neck),
    ("weapon", EquipSlot::Weapon),
    ("sword", EquipSlot::Weapon),
    ("blade", EquipSlot::Weapon),
];

const FILLER: &[&str] = &["the", "a", "an", "at", "to", "with", "on", "up"];

/// A tokenized command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// None when the first word is not a known verb
    pub verb: Option<Verb>,
    /// First word, lowercased
    pub word: String,
    /// Remaining words, lowercased, filler removed
    pub args: Vec<String>,
    pub raw: String,
}

impl Command {
    /// Arguments joined back into one phrase
    pub fn target(&self) -> Option<String> {
        (!self.args.is_empty()).then(|| self.args.join(" "))
    }

    pub fn direction(&self) -> Option<Direction> {
        self.args.first().and_then(|a| Direction::from_word(a))
    }
}

fn lookup_verb(word: &str) -> Option<Verb> {
    VERB_SYNONYMS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, verb)| *verb)
}

/// Tokenize `text`; None for blank input.
///
/// Bare directions become `Go <direction>`. "a" is only the attack verb
/// in first position; elsewhere it is filler.
pub fn parse(text: &str) -> Option<Command> {
    let raw = text.trim().to_string();
    let mut words = raw.split_whitespace().map(str::to_lowercase);
    let word = words.next()?;
    let rest: Vec<String> = words.collect();

    if let Some(direction) = Direction::from_word(&word) {
        // "d" and "down" are movement, never the verb table
        return Some(Command {
            verb: Some(Verb::Go),
            word,
            args: vec![direction.name().to_string()],
            raw,
        });
    }

    let verb = lookup_verb(&word);
    let args: Vec<String> = match verb {
        Some(Verb::Go) => rest,
        _ => rest
            .into_iter()
            .filter(|w| !FILLER.contains(&w.as_str()))
            .collect(),
    };

    Some(Command {
        verb,
        word,
        args,
        raw,
    })
}

/// Resolve a slot name or alias
pub fn parse_slot(word: &str) -> Option<EquipSlot> {
    let word = word.to_lowercase();
    SLOT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == word)
        .map(|(_, slot)| *slot)
}

/// Fallback interpreter for input no mode handler recognizes
pub trait CommandInterpreter: Send {
    fn interpret(&mut self, text: &str) -> Option<String>;
}

/// Interpreter that never understands anything
#[derive(Debug, Default)]
pub struct NullInterpreter;

impl CommandInterpreter for NullInterpreter {
    fn interpret(&mut self, _text: &str) -> Option<String> {
        None
    }
}
