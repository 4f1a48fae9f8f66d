//! Test game wrapper

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use delve::clock::ManualClock;
use delve::demo;
use delve::entity::Entity;
use delve::game::Rules;
use delve::world::{Room, World};
use delve::{Game, GameMode};

const SEED: u64 = 7;

/// A game plus the clock that drives it
pub struct TestGame {
    pub game: Game,
    pub clock: ManualClock,
}

impl TestGame {
    /// Demo game, still on the title screen
    pub fn new() -> Self {
        Self::from_game(demo::game())
    }

    /// Demo game, already exploring the village square
    pub fn started() -> Self {
        let mut test = Self::new();
        test.send("start");
        assert_eq!(test.game.mode(), GameMode::Exploration);
        test
    }

    /// Demo game with custom rules, on the title screen
    pub fn with_rules(rules: Rules) -> Self {
        Self::from_game(demo::game().with_rules(rules))
    }

    pub fn from_game(game: Game) -> Self {
        let clock = ManualClock::new();
        let game = game.with_clock(clock.clone()).with_seed(SEED);
        Self { game, clock }
    }

    /// One line of input followed by one tick
    pub fn send(&mut self, line: &str) -> String {
        let reply = self.game.process_command(line).unwrap_or_default();
        self.game.update();
        reply
    }

    /// Send several lines, returning the last reply
    pub fn run(&mut self, lines: &[&str]) -> String {
        let mut reply = String::new();
        for line in lines {
            reply = self.send(line);
        }
        reply
    }

    /// Let `secs` of game time pass, then tick
    pub fn wait(&mut self, secs: f64) {
        self.clock.advance(secs);
        self.game.update();
    }

    /// Whether any history line contains `needle`
    pub fn logged(&self, needle: &str) -> bool {
        self.game.history().contains(needle)
    }

    /// Number of history lines containing `needle`
    pub fn logged_count(&self, needle: &str) -> usize {
        self.game
            .history()
            .entries()
            .iter()
            .filter(|e| e.message.contains(needle))
            .count()
    }
}

impl Deref for TestGame {
    type Target = Game;

    fn deref(&self) -> &Self::Target {
        &self.game
    }
}

impl DerefMut for TestGame {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.game
    }
}

/// A single room holding one enemy, using the demo items and hero
pub fn arena(enemy: Entity) -> TestGame {
    let world = World::new("arena")
        .with_room(Room::new("arena", "Arena", "Packed sand under open sky.").with_enemy(enemy));
    let game = Game::new(world, Arc::new(demo::catalog()), demo::player());
    let mut test = TestGame::from_game(game);
    test.send("start");
    test
}
