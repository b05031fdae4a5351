//! Scripted language model and title generator.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use memechat::chat::{
    domain::ReplyChunk,
    ports::{LanguageModel, ModelError, ModelRequest, ModelStream, TitleError, TitleGenerator},
};

/// Replays the current script and records every request.
#[derive(Debug)]
pub struct ScriptedModel {
    script: Mutex<Vec<Result<ReplyChunk, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedModel {
    /// Creates a model that answers "Sure.".
    pub fn new() -> Self {
        Self {
            script: Mutex::new(vec![Ok(ReplyChunk::Text("Sure.".to_owned()))]),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the reply script.
    pub fn set_script(&self, script: Vec<Result<ReplyChunk, ModelError>>) {
        if let Ok(mut guard) = self.script.lock() {
            *guard = script;
        }
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn stream(&self, request: ModelRequest) -> Result<ModelStream, ModelError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        let script = self
            .script
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| ModelError::Provider(e.to_string()))?;
        Ok(stream::iter(script).boxed())
    }
}

/// Titles every chat with the same text.
#[derive(Debug)]
pub struct FixedTitle(pub &'static str);

#[async_trait]
impl TitleGenerator for FixedTitle {
    async fn generate(&self, _message: &str) -> Result<String, TitleError> {
        Ok(self.0.to_owned())
    }
}
