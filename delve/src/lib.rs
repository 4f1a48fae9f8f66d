//! delve - adventure game runtime core
//!
//! Mode state machine, turn-based combat, timed status effects and
//! tiered loot for a room-navigation adventure. Content (rooms, items,
//! dialogue) comes in through the catalog and world traits.

pub mod catalog;
pub mod clock;
pub mod combat;
pub mod commands;
pub mod config;
pub mod demo;
pub mod entity;
pub mod error;
pub mod game;
pub mod history;
pub mod loot;
pub mod player;
pub mod save;
pub mod session;
pub mod world;

pub use config::Config;
pub use error::GameError;
pub use game::{Game, GameMode, TransitionContext};
pub use session::SharedGame;
