//! Scenario tests for the demo adventure
//!
//! - Modes: transitions, returns and per-mode help
//! - Exploration: movement, items, locks and treasure
//! - Combat: targeting, damage, fleeing, skills and defeat
//! - Effects: poison stacking and tick throttling
//! - Town: shop, inn and dialogue
//! - Persistence: save and load through the menu

pub mod combat;
pub mod effects;
pub mod exploration;
pub mod modes;
pub mod persistence;
pub mod town;
