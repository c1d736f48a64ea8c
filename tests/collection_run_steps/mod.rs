//! Step definitions for collection run scenarios.

pub mod world;

mod given;
mod then;
mod when;
