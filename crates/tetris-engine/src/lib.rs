//! Tetris engine crate.
//!
//! Owns the batched quad renderer and the platform + GPU runtime pieces the game
//! binary drives it with.

pub mod bounded;
pub mod math;
pub mod coords;
pub mod render;

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
