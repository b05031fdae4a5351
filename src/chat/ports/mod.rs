//! Port trait definitions for the chat orchestrator.
//!
//! - [`repository::ChatRepository`]: chat and message storage
//! - [`model::LanguageModel`]: streamed completions
//! - [`title::TitleGenerator`]: chat titles from a first message

pub mod model;
pub mod repository;
pub mod title;

pub use model::{LanguageModel, ModelError, ModelMessage, ModelRequest, ModelStream};
pub use repository::{ChatRepository, RepositoryResult};
pub use title::{TitleError, TitleGenerator};
