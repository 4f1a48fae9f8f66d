//! Errors for invariant violations
//!
//! Player mistakes never end up here; handlers answer those with a
//! message and leave state alone.

use thiserror::Error;

use crate::save::SaveError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown game mode: {0}")]
    UnknownMode(String),

    #[error("room does not exist: {0}")]
    UnknownRoom(String),

    #[error(transparent)]
    Save(#[from] SaveError),
}
