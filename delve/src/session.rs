//! Shared game sessions
//!
//! None of the game's mutations commute, so concurrent callers go
//! through one mutex per session and every command runs to completion
//! before the next is accepted.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use crate::game::Game;

#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<Mutex<Game>>,
}

impl SharedGame {
    pub fn new(game: Game) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    /// Run one command and the tick that follows it
    pub fn command(&self, text: &str) -> Option<String> {
        let mut game = self.inner.lock();
        let reply = game.process_command(text);
        game.update();
        reply
    }

    pub fn update(&self) {
        self.inner.lock().update();
    }

    /// Exclusive access for anything else
    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo;
    use std::thread;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_shared_game_is_send_sync() {
        assert_send_sync::<SharedGame>();
    }

    #[test]
    fn test_commands_from_threads() {
        let shared = SharedGame::new(demo::game().with_seed(1));
        shared.command("start");

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.command("look"))
            })
            .collect();
        for handle in handles {
            let reply = handle.join().unwrap().unwrap();
            assert!(reply.contains("Village Square"));
        }
        assert_eq!(shared.lock().handler_runs(), 1 + 1 + 4);
    }
}
