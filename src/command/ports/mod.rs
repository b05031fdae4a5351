//! Port trait definitions for slash-command handling.
//!
//! The trading backend is the only external collaborator commands talk to.

pub mod trading;

pub use trading::{AdapterError, AdapterResult, TradingAdapter};
