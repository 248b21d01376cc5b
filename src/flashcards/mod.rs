//! Spaced repetition engine for Recall
//!
//! This module provides:
//! - Card and review models (with the on-disk JSON shape)
//! - De-scored SM-2 scheduling
//! - Daily queue building with anti-streak domain mixing
//! - The review session controller
//! - Gist folding of well-known cards
//! - JSON state storage, export and import

pub mod algorithm;
mod cards;
pub mod gist;
pub mod models;
pub mod queue;
pub mod session;
pub mod storage;

pub use models::*;
pub use session::{AnswerOutcome, ReviewSession, SessionError, SessionStatus};
pub use storage::{JsonFileStore, StateStore, StorageError};
