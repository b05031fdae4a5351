//! Unit tests for chat storage, history filtering, and turn orchestration.
