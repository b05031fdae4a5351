//! Ollama adapter for streamed completions and chat titles.
//!
//! Talks to `POST {base}/chat`. Streamed responses are newline-delimited
//! JSON objects; `<think>` spans in the content are split off as reasoning
//! while streaming.

use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::chat::{
    domain::{MAX_TITLE_CHARS, ReplyChunk, Role, ThinkTagSplitter, sanitize_reply, truncate_chars},
    ports::{LanguageModel, ModelError, ModelRequest, ModelStream, TitleError, TitleGenerator},
};

/// Model used when none is configured.
pub const DEFAULT_OLLAMA_MODEL: &str = "hf.co/kllalio/gguf16q4-instruct:latest";

/// Longest silence tolerated from the provider before a reply is abandoned.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(60);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const CHUNK_BUFFER: usize = 32;
const MAX_ERROR_BODY: usize = 512;

const TITLE_PROMPT: &str = "\
- you will generate a short title based on the first message a user begins a conversation with
- ensure it is not more than 80 characters long
- the title should be a summary of the user's message
- do not use quotes or colons";

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireOptions {
    num_predict: u32,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<WireOptions>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    thinking: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatFrame {
    #[serde(default)]
    message: Option<FrameMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Turns raw response bytes into reply chunks.
#[derive(Debug, Default)]
struct ReplyDecoder {
    pending: Vec<u8>,
    splitter: ThinkTagSplitter,
    done: bool,
}

impl ReplyDecoder {
    fn push(&mut self, bytes: &[u8]) -> Result<Vec<ReplyChunk>, ModelError> {
        self.pending.extend_from_slice(bytes);
        let mut out = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&byte| byte == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            self.decode_line(&line, &mut out)?;
        }
        Ok(out)
    }

    fn finish(&mut self) -> Result<Vec<ReplyChunk>, ModelError> {
        let line = std::mem::take(&mut self.pending);
        let mut out = Vec::new();
        self.decode_line(&line, &mut out)?;
        out.extend(self.splitter.finish());
        Ok(out)
    }

    fn decode_line(&mut self, line: &[u8], out: &mut Vec<ReplyChunk>) -> Result<(), ModelError> {
        let text = std::str::from_utf8(line).map_err(|e| ModelError::Decode(e.to_string()))?;
        let text = text.trim();
        if text.is_empty() || self.done {
            return Ok(());
        }

        let frame: ChatFrame =
            serde_json::from_str(text).map_err(|e| ModelError::Decode(e.to_string()))?;
        if let Some(message) = frame.error {
            return Err(ModelError::Provider(message));
        }
        if let Some(message) = frame.message {
            if let Some(thinking) = message.thinking.filter(|t| !t.is_empty()) {
                out.push(ReplyChunk::Reasoning(thinking));
            }
            out.extend(self.splitter.push(&message.content));
        }
        if frame.done {
            self.done = true;
            out.extend(self.splitter.finish());
        }
        Ok(())
    }
}

/// Client for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    stall_timeout: Duration,
}

impl OllamaClient {
    /// Creates a client for `model` served under `base_url`
    /// (for example `http://127.0.0.1:11434/api`).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Transport`] when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, ModelError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            model: model.into(),
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        })
    }

    /// Sets how long a reply may go without new data before it fails with
    /// [`ModelError::Transport`]. Also bounds title requests.
    #[must_use]
    pub const fn with_stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }

    async fn post(
        &self,
        body: &WireRequest<'_>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, ModelError> {
        let mut request = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(body);
        if let Some(limit) = timeout {
            request = request.timeout(limit);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        Err(ModelError::Status {
            status: status.as_u16(),
            body: text.chars().take(MAX_ERROR_BODY).collect(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn stream(&self, request: ModelRequest) -> Result<ModelStream, ModelError> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: Role::System.as_str(),
            content: &request.system,
        });
        messages.extend(request.messages.iter().map(|message| WireMessage {
            role: message.role.as_str(),
            content: &message.content,
        }));
        let body = WireRequest {
            model: &self.model,
            messages,
            stream: true,
            options: Some(WireOptions {
                num_predict: request.max_tokens,
            }),
        };

        let response = self.post(&body, None).await?;
        let (sender, receiver) = mpsc::channel(CHUNK_BUFFER);
        tokio::spawn(pump(response.bytes_stream(), sender, self.stall_timeout));

        Ok(ReceiverStream::new(receiver).boxed())
    }
}

/// Decodes response bytes into chunks until the body ends or the consumer
/// goes away. A provider silent for longer than `stall_timeout` fails the
/// reply.
async fn pump<S, B, E>(
    body: S,
    sender: mpsc::Sender<Result<ReplyChunk, ModelError>>,
    stall_timeout: Duration,
) where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut bytes = std::pin::pin!(body);
    let mut decoder = ReplyDecoder::default();
    loop {
        let item = match tokio::time::timeout(stall_timeout, bytes.next()).await {
            Ok(Some(item)) => item,
            Ok(None) => break,
            Err(_) => {
                debug!(?stall_timeout, "model stream stalled");
                let stalled = ModelError::Transport(format!(
                    "no data from model for {}s",
                    stall_timeout.as_secs()
                ));
                forward(&sender, Err(stalled)).await;
                return;
            }
        };
        let decoded = item
            .map_err(|e| ModelError::Transport(e.to_string()))
            .and_then(|chunk| decoder.push(chunk.as_ref()));
        if !forward(&sender, decoded).await {
            return;
        }
    }
    forward(&sender, decoder.finish()).await;
}

/// Sends decoded chunks downstream. Returns `false` when streaming should
/// stop, either because the consumer is gone or because of an error.
async fn forward(
    sender: &mpsc::Sender<Result<ReplyChunk, ModelError>>,
    decoded: Result<Vec<ReplyChunk>, ModelError>,
) -> bool {
    match decoded {
        Ok(chunks) => {
            for chunk in chunks {
                if sender.send(Ok(chunk)).await.is_err() {
                    debug!("completion consumer dropped");
                    return false;
                }
            }
            true
        }
        Err(error) => {
            if sender.send(Err(error)).await.is_err() {
                debug!("completion consumer dropped");
            }
            false
        }
    }
}

#[async_trait]
impl TitleGenerator for OllamaClient {
    async fn generate(&self, message: &str) -> Result<String, TitleError> {
        let body = WireRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: Role::System.as_str(),
                    content: TITLE_PROMPT,
                },
                WireMessage {
                    role: Role::User.as_str(),
                    content: message,
                },
            ],
            stream: false,
            options: None,
        };

        let response = self
            .post(&body, Some(self.stall_timeout))
            .await
            .map_err(|e| TitleError::Failed(e.to_string()))?;
        let frame: ChatFrame = response
            .json()
            .await
            .map_err(|e| TitleError::Failed(e.to_string()))?;
        if let Some(error) = frame.error {
            return Err(TitleError::Failed(error));
        }
        clean_title(&frame.message.unwrap_or_default().content)
    }
}

/// Strips reasoning, quotes, and colons, and caps the length.
fn clean_title(raw: &str) -> Result<String, TitleError> {
    let reply = sanitize_reply(raw, String::new());
    let stripped: String = reply
        .content
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | ':'))
        .collect();
    let title = truncate_chars(stripped.trim(), MAX_TITLE_CHARS).trim_end();
    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    Ok(title.to_owned())
}
