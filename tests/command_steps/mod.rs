//! Step definitions for command catalogue scenarios.

mod given;
mod when;
pub mod world;
