//! Adapter implementations for command ports.

pub mod http;
