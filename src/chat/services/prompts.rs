//! System prompts.

use crate::chat::domain::DEFAULT_MODEL_SELECTOR;

const REGULAR_PROMPT: &str =
    "You are a friendly assistant! Keep your responses concise and helpful.";

const COMMANDS_PROMPT: &str = "Users can manage meme coins with slash commands. \
When asked how to create, swap, list, or send tokens, tell them to type /help \
to see every available command and its arguments.";

/// Returns the system prompt for a model selector.
///
/// The reasoning profile gets the bare prompt; every other profile also
/// learns about slash commands.
#[must_use]
pub fn system_prompt(model_selector: &str) -> String {
    if model_selector == DEFAULT_MODEL_SELECTOR {
        REGULAR_PROMPT.to_owned()
    } else {
        format!("{REGULAR_PROMPT}\n\n{COMMANDS_PROMPT}")
    }
}
