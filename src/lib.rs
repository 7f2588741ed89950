//! Coordinate and state engine for a virtual tabletop scene viewer.

pub mod logic;
pub mod models;
pub mod shared;
pub mod state;
pub mod storage;
pub mod system;
