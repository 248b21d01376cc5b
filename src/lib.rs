//! Recall: a personal spaced-repetition memorization tool.
//!
//! The engine lives in [`flashcards`]; [`config`] holds the user settings
//! read by the command-line front end.

pub mod config;
pub mod flashcards;
