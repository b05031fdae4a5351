//! Application services for chat turns.

mod history;
mod orchestrator;
mod prompts;

pub use history::filter_history;
pub use orchestrator::{
    ChatService, ChatServiceError, ChatServiceResult, ChatSettings, DEFAULT_MAX_TOKENS,
    EventStream,
};
pub use prompts::system_prompt;
