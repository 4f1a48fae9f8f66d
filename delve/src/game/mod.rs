//! Game state machine
//!
//! The top-level controller. Exactly one [`GameMode`] is current; a
//! single previous-mode slot allows one level of "return". Every mode has
//! one entry in a static handler table:
//! - `update` runs when the mode is entered and again on every tick
//! - `command` answers free text already tokenized into a [`Command`]
//!
//! Re-entering the current mode is a no-op: no log line, no handler run.

mod combat;
mod dialogue;
mod exploration;
mod inventory;
mod rest;
mod shop;
mod system;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::catalog::{find_item, ContentCatalog, ItemUse, UseContext};
use crate::clock::{Clock, SystemClock};
use crate::combat::{CombatSession, SkillBook};
use crate::commands::{self, Command, CommandInterpreter, NullInterpreter, Verb};
use crate::config::Config;
use crate::entity::Entity;
use crate::error::GameError;
use crate::history::{Color, History, HistorySink};
use crate::loot::{LootBundle, LootGenerator, LootTable, COIN_KEY};
use crate::player::Player;
use crate::save::{CombatSnapshot, EffectSnapshot, EntitySnapshot, GameSnapshot, SaveManager};
use crate::world::{Room, WorldProvider};

pub use combat::health_bar;

/// Reply when the current mode has no handler
pub const CANNOT_PROCESS: &str = "The game cannot process commands right now.";

const NOWHERE: &str = "You are nowhere at all.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Exploration,
    Combat,
    Dialogue,
    Inventory,
    Shop,
    Rest,
    GameOver,
    Title,
    Menu,
}

impl GameMode {
    pub const ALL: [GameMode; 9] = [
        GameMode::Exploration,
        GameMode::Combat,
        GameMode::Dialogue,
        GameMode::Inventory,
        GameMode::Shop,
        GameMode::Rest,
        GameMode::GameOver,
        GameMode::Title,
        GameMode::Menu,
    ];

    /// Identifier used in config and saves
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Exploration => "exploration",
            GameMode::Combat => "combat",
            GameMode::Dialogue => "dialogue",
            GameMode::Inventory => "inventory",
            GameMode::Shop => "shop",
            GameMode::Rest => "rest",
            GameMode::GameOver => "game_over",
            GameMode::Title => "title",
            GameMode::Menu => "menu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Exploration => "Exploration",
            GameMode::Combat => "Combat",
            GameMode::Dialogue => "Dialogue",
            GameMode::Inventory => "Inventory",
            GameMode::Shop => "Shop",
            GameMode::Rest => "Rest",
            GameMode::GameOver => "Game Over",
            GameMode::Title => "Title",
            GameMode::Menu => "Menu",
        }
    }

    /// In-world modes, where time passes for the player
    fn is_live(&self) -> bool {
        !matches!(self, GameMode::Title | GameMode::Menu | GameMode::GameOver)
    }
}

impl FromStr for GameMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        GameMode::ALL
            .into_iter()
            .find(|mode| mode.key() == key || (key == "gameover" && *mode == GameMode::GameOver))
            .ok_or_else(|| GameError::UnknownMode(s.to_string()))
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Data handed to the mode being entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionContext {
    /// Indices into the current room's enemy list
    pub enemies: Vec<usize>,
    /// Index into the current room's NPC list
    pub npc: Option<usize>,
}

impl TransitionContext {
    pub fn enemies(enemies: Vec<usize>) -> Self {
        Self {
            enemies,
            npc: None,
        }
    }

    pub fn npc(npc: usize) -> Self {
        Self {
            enemies: Vec::new(),
            npc: Some(npc),
        }
    }
}

/// Tuning values read from config
#[derive(Debug, Clone)]
pub struct Rules {
    pub flee_chance: f64,
    pub save_path: PathBuf,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            flee_chance: 0.5,
            save_path: PathBuf::from("delve-save.json"),
        }
    }
}

struct ModeHandler {
    mode: GameMode,
    update: fn(&mut Game),
    command: fn(&mut Game, &Command) -> Option<String>,
    help: &'static str,
}

static MODE_HANDLERS: &[ModeHandler] = &[
    ModeHandler {
        mode: GameMode::Exploration,
        update: exploration::update,
        command: exploration::command,
        help: "look, go <direction> (or n/s/e/w/ne/nw/se/sw/u/d), take <item>, drop <item>, \
               inventory, examine <target>, attack <target>, use <item>, equip <item>, \
               unequip <slot>, unlock <direction|item>, open <item>, talk <name>, shop, rest, \
               status, menu, quit",
    },
    ModeHandler {
        mode: GameMode::Combat,
        update: combat::update,
        command: combat::command,
        help: combat::USAGE,
    },
    ModeHandler {
        mode: GameMode::Dialogue,
        update: dialogue::update,
        command: dialogue::command,
        help: "next, look, bye",
    },
    ModeHandler {
        mode: GameMode::Inventory,
        update: inventory::update,
        command: inventory::command,
        help: "examine <item>, use <item>, drop <item>, equip <item>, unequip <slot|item>, \
               sort <name|quantity|value|type>, status, back",
    },
    ModeHandler {
        mode: GameMode::Shop,
        update: shop::update,
        command: shop::command,
        help: "list, buy <item>, sell <item>, examine <item>, inventory, back",
    },
    ModeHandler {
        mode: GameMode::Rest,
        update: rest::update,
        command: rest::command,
        help: "yes, no",
    },
    ModeHandler {
        mode: GameMode::GameOver,
        update: system::game_over_update,
        command: system::game_over_command,
        help: "",
    },
    ModeHandler {
        mode: GameMode::Title,
        update: system::title_update,
        command: system::title_command,
        help: "start, load, quit",
    },
    ModeHandler {
        mode: GameMode::Menu,
        update: system::menu_update,
        command: system::menu_command,
        help: "save, load, resume, quit",
    },
];

fn handler_for(mode: GameMode) -> Option<&'static ModeHandler> {
    MODE_HANDLERS.iter().find(|h| h.mode == mode)
}

/// The game: modes, player, world and everything they touch
pub struct Game {
    mode: GameMode,
    previous: Option<GameMode>,
    context: TransitionContext,
    player: Player,
    starting_player: Player,
    world: Box<dyn WorldProvider>,
    catalog: Arc<dyn ContentCatalog>,
    loot: LootGenerator,
    skills: SkillBook,
    combat: Option<CombatSession>,
    dialogue: Option<dialogue::DialogueState>,
    history: History,
    interpreter: Box<dyn CommandInterpreter>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    rules: Rules,
    handler_runs: u64,
    quit: bool,
}

impl Game {
    /// New game on the title screen
    pub fn new(
        world: impl WorldProvider + 'static,
        catalog: Arc<dyn ContentCatalog>,
        mut player: Player,
    ) -> Self {
        player.refresh_gear(catalog.as_ref());
        Self {
            mode: GameMode::Title,
            previous: None,
            context: TransitionContext::default(),
            starting_player: player.clone(),
            player,
            world: Box::new(world),
            catalog,
            loot: LootGenerator::new(LootTable::new()),
            skills: SkillBook::new(),
            combat: None,
            dialogue: None,
            history: History::new(),
            interpreter: Box::new(NullInterpreter),
            clock: Box::new(SystemClock::new()),
            rng: StdRng::from_os_rng(),
            rules: Rules::default(),
            handler_runs: 0,
            quit: false,
        }
    }

    pub fn with_loot(mut self, loot: LootGenerator) -> Self {
        self.loot = loot;
        self
    }

    pub fn with_skills(mut self, skills: SkillBook) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl CommandInterpreter + 'static) -> Self {
        self.interpreter = Box::new(interpreter);
        self
    }

    /// Apply tuning values and the seed from `config`
    pub fn with_config(mut self, config: &Config) -> Self {
        if let Some(seed) = config.seed {
            self = self.with_seed(seed);
        }
        self.rules = Rules {
            flee_chance: config.flee_chance,
            save_path: config.save_path.clone(),
        };
        self
    }

    // ---- state machine ----

    /// Enter `mode`, running its handler. Re-entering the current mode does nothing.
    pub fn transition_to(&mut self, mode: GameMode, context: TransitionContext) {
        if mode == self.mode {
            return;
        }
        debug!("mode {} -> {}", self.mode, mode);
        self.previous = Some(self.mode);
        self.mode = mode;
        self.context = context;
        self.log(format!("Entering {} mode", mode), Some(Color::Gray));
        self.run_handler();
    }

    /// Transition by mode name; unknown names are an error
    pub fn transition_to_named(&mut self, name: &str) -> Result<(), GameError> {
        let mode: GameMode = name.parse()?;
        self.transition_to(mode, TransitionContext::default());
        Ok(())
    }

    /// Swap back to the previous mode, or go exploring if there is none
    pub fn return_to_previous(&mut self) {
        match self.previous {
            Some(previous) => {
                debug!("mode {} -> {} (return)", self.mode, previous);
                self.previous = Some(self.mode);
                self.mode = previous;
                self.run_handler();
            }
            None => self.transition_to(GameMode::Exploration, TransitionContext::default()),
        }
    }

    /// Route one line of player input to the current mode
    pub fn process_command(&mut self, text: &str) -> Option<String> {
        let Some(handler) = handler_for(self.mode) else {
            warn!("no handler registered for {}", self.mode);
            return Some(CANNOT_PROCESS.to_string());
        };
        let command = commands::parse(text)?;
        if command.verb == Some(Verb::Help) && !handler.help.is_empty() {
            return Some(format!("{} commands: {}", self.mode, handler.help));
        }

        let reply = (handler.command)(self, &command)
            .or_else(|| self.interpreter.interpret(&command.raw))
            .unwrap_or_else(|| "I don't understand that.".to_string());
        Some(reply)
    }

    /// One game tick
    pub fn update(&mut self) {
        self.run_handler();
    }

    fn run_handler(&mut self) {
        self.handler_runs += 1;
        if self.mode.is_live() {
            self.tick_player();
            if !self.mode.is_live() {
                return;
            }
        }
        if let Some(handler) = handler_for(self.mode) {
            (handler.update)(self);
        }
    }

    fn tick_player(&mut self) {
        let now = self.now();
        for message in self.player.entity.update_effects(now) {
            self.log(message, Some(Color::Magenta));
        }
        if !self.player.entity.is_alive() {
            self.defeat();
        }
    }

    /// The player has fallen
    fn defeat(&mut self) {
        info!("{} was defeated", self.player.entity.name);
        self.log("You have been defeated.", Some(Color::Red));
        self.finish_combat();
        self.dialogue = None;
        self.transition_to(GameMode::GameOver, TransitionContext::default());
    }

    // ---- accessors ----

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn previous_mode(&self) -> Option<GameMode> {
        self.previous
    }

    pub fn is_in_state(&self, mode: GameMode) -> bool {
        self.mode == mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn world(&self) -> &dyn WorldProvider {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> &mut dyn WorldProvider {
        self.world.as_mut()
    }

    pub fn combat(&self) -> Option<&CombatSession> {
        self.combat.as_ref()
    }

    pub fn catalog(&self) -> &dyn ContentCatalog {
        self.catalog.as_ref()
    }

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// How many times a mode handler has run
    pub fn handler_runs(&self) -> u64 {
        self.handler_runs
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    // ---- shared helpers for the mode handlers ----

    fn log(&mut self, message: impl Into<String>, color: Option<Color>) {
        let message = message.into();
        self.history.add_to_history(&message, color);
    }

    fn room(&self) -> Option<&Room> {
        self.world.current_room()
    }

    fn describe_room(&self) -> String {
        self.room()
            .map(|room| room.describe(self.catalog.as_ref()))
            .unwrap_or_else(|| NOWHERE.to_string())
    }

    /// Use a carried item; consumables are used up on success
    fn use_item(&mut self, query: &str) -> ItemUse {
        let catalog = Arc::clone(&self.catalog);
        let Some(id) = find_item(catalog.as_ref(), query, self.player.inventory.ids()) else {
            return ItemUse::fail(format!("You don't have any {}.", query));
        };
        let Some(def) = catalog.resolve(&id) else {
            return ItemUse::fail(format!("You don't have any {}.", query));
        };

        let now = self.now();
        let in_combat = self.combat.as_ref().is_some_and(CombatSession::is_active);
        let enemies: &mut [Entity] = match self.combat.as_mut() {
            Some(session) => session.enemies_mut(),
            None => &mut [],
        };
        let mut ctx = UseContext {
            user: &mut self.player.entity,
            enemies,
            in_combat,
            now,
        };
        let used = catalog.use_item(def, &mut ctx);
        if used.success && def.is_consumable() {
            self.player.inventory.remove(&id, 1);
        }
        used
    }

    /// Hand out a loot bundle. Coins always go to the player; items go to
    /// the room floor or the pack. Returns a summary, empty if nothing.
    fn collect_loot(&mut self, bundle: LootBundle, into_room: bool) -> String {
        let mut found = Vec::new();
        for (id, quantity) in bundle {
            if quantity == 0 {
                continue;
            }
            if id == COIN_KEY {
                self.player.coins += quantity;
                found.push(format!("{} coins", quantity));
                continue;
            }
            let name = self.catalog.display_name(&id);
            if into_room {
                if let Some(room) = self.world.current_room_mut() {
                    room.items.add(&id, quantity);
                }
            } else {
                self.player.inventory.add(&id, quantity);
            }
            found.push(if quantity > 1 {
                format!("{} x{}", name, quantity)
            } else {
                name
            });
        }
        found.join(", ")
    }

    /// Experience and drops for a defeated enemy
    fn reward(&mut self, enemy: &Entity) -> Vec<String> {
        let mut lines = Vec::new();
        if enemy.experience > 0 {
            lines.push(format!("You gain {} experience.", enemy.experience));
            if self.player.entity.grant_experience(enemy.experience) > 0 {
                lines.push(format!("You are now level {}!", self.player.entity.level));
            }
        }
        if let Some(tier) = enemy.loot_tier {
            let level = self.player.entity.level;
            let bundle = self.loot.generate(tier, level, &mut self.rng);
            debug!("{} dropped {:?}", enemy.name, bundle);
            let found = self.collect_loot(bundle, true);
            if !found.is_empty() {
                lines.push(format!("The {} drops {}.", enemy.name, found));
            }
        }
        lines
    }

    /// Close the combat session, putting survivors back in the room
    fn finish_combat(&mut self) {
        if let Some(session) = self.combat.take() {
            let survivors = session.end();
            if let Some(room) = self.world.current_room_mut() {
                room.enemies.extend(survivors);
            }
        }
    }

    /// Character sheet
    fn status_text(&self) -> String {
        let entity = &self.player.entity;
        let mut lines = vec![
            format!("{} (level {})", entity.name, entity.level),
            format!(
                "Health: {} {}/{}",
                health_bar(entity.health_fraction()),
                entity.health,
                entity.max_health
            ),
            format!(
                "Attack: {}  Defense: {}",
                entity.effective_attack(),
                entity.effective_defense()
            ),
            format!("Experience: {}/{}", entity.experience, entity.next_level_at()),
            format!("Coins: {}", self.player.coins),
        ];
        let now = self.now();
        let effects: Vec<String> = entity
            .effects()
            .iter()
            .map(|e| format!("{} ({:.0}s)", e.name, e.remaining(now)))
            .collect();
        if !effects.is_empty() {
            lines.push(format!("Effects: {}", effects.join(", ")));
        }
        lines.join("\n")
    }

    fn restart(&mut self) -> String {
        info!("restarting");
        self.combat = None;
        self.dialogue = None;
        self.world.reset();
        self.player = self.starting_player.clone();
        self.skills.reset_cooldowns();
        self.transition_to(GameMode::Exploration, TransitionContext::default());
        format!("You awaken once more.\n{}", self.describe_room())
    }

    // ---- persistence ----

    /// Capture everything needed to resume
    pub fn snapshot(&self) -> GameSnapshot {
        let now = self.now();
        GameSnapshot {
            mode: self.mode,
            previous: self.previous,
            player: self.player.clone(),
            player_effects: self
                .player
                .entity
                .effects()
                .iter()
                .map(|e| EffectSnapshot::capture(e, now))
                .collect(),
            room: self.world.current_room_id().to_string(),
            rooms: self.world.export_rooms(),
            combat: self.combat.as_ref().map(|session| CombatSnapshot {
                enemies: session
                    .enemies()
                    .iter()
                    .map(|e| EntitySnapshot::capture(e, now))
                    .collect(),
                order: session.order().to_vec(),
                current: session.current_index(),
            }),
            cooldowns: self.skills.cooldowns(now),
        }
    }

    /// Resume from a snapshot without running any handler
    pub fn restore(&mut self, snapshot: GameSnapshot) -> Result<(), GameError> {
        if self.world.room(&snapshot.room).is_none() {
            return Err(GameError::UnknownRoom(snapshot.room));
        }
        self.world.import_rooms(snapshot.rooms);
        self.world.set_current_room(&snapshot.room);
        let now = self.now();

        let mut player = snapshot.player;
        player.entity.effects_mut().clear();
        for effect in &snapshot.player_effects {
            player.entity.effects_mut().restore(effect.revive(now));
        }
        player.refresh_gear(self.catalog.as_ref());
        self.player = player;

        self.combat = snapshot.combat.map(|saved| {
            let enemies = saved.enemies.into_iter().map(|e| e.into_entity(now)).collect();
            CombatSession::resume(enemies, saved.order, saved.current)
        });
        self.skills.restore_cooldowns(&snapshot.cooldowns, now);
        self.dialogue = None;
        self.context = TransitionContext::default();
        self.mode = snapshot.mode;
        self.previous = snapshot.previous;
        info!("restored game in {} mode", self.mode);
        Ok(())
    }

    pub fn save_game(&self) -> Result<(), GameError> {
        SaveManager::new(&self.rules.save_path).save(&self.snapshot())?;
        Ok(())
    }

    pub fn load_game(&mut self) -> Result<(), GameError> {
        let snapshot = SaveManager::new(&self.rules.save_path).load()?;
        self.restore(snapshot)
    }
}
