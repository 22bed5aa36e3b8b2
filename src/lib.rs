//! Peg Billiards - deterministic shot simulation and AI opponent
//!
//! Core modules:
//! - `game`: physics, shot search, AI selection/humanization, playback and
//!   the authoritative match loop
//! - `net`: wire messages and client-side ordering of trusted outcomes
//! - `config`: environment configuration
//! - `app`: shared application state

pub mod app;
pub mod config;
pub mod game;
pub mod net;
pub mod util;
