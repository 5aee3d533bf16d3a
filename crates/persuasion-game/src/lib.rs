//! Argument evaluation and progression engine for the persuasion game.
//!
//! [`game`] scores arguments and moves the simulated opponent's stance;
//! [`progression`] tracks streaks, experience points, levels and badges.

pub mod config;
pub mod error;
pub mod game;
pub mod progression;
pub mod telemetry;
