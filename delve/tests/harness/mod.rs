//! Integration Test Harness
//!
//! - `TestGame` - the demo adventure on a manual clock and a fixed seed,
//!   driven one line at a time the way the terminal front end does
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::TestGame;
//!
//! #[test]
//! fn test_walk_north() {
//!     let mut game = TestGame::started();
//!     let reply = game.send("north");
//!     assert!(reply.contains("Dark Forest"));
//! }
//! ```

mod game;

pub use game::{arena, TestGame};
