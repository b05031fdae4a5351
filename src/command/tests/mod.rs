//! Unit tests for slash-command parsing, dispatch, and rendering.
