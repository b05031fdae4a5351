//! Separation of `<think>` reasoning from visible reply text.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// A piece of model output after reasoning extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyChunk {
    /// Visible text.
    Text(String),
    /// Reasoning trace.
    Reasoning(String),
}

/// Incremental splitter for `<think>…</think>` spans.
///
/// Tags may arrive split across chunks. Only a trailing fragment that could
/// still become a tag is held back; everything else is released as soon as
/// it is pushed.
///
/// ```
/// use memechat::chat::domain::{ReplyChunk, ThinkTagSplitter};
///
/// let mut splitter = ThinkTagSplitter::new();
/// let mut chunks = splitter.push("<thi");
/// chunks.extend(splitter.push("nk>plan</think>Hi"));
/// chunks.extend(splitter.finish());
/// assert_eq!(
///     chunks,
///     [
///         ReplyChunk::Reasoning("plan".to_owned()),
///         ReplyChunk::Text("Hi".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct ThinkTagSplitter {
    pending: String,
    in_reasoning: bool,
}

impl ThinkTagSplitter {
    /// Creates a splitter positioned outside any reasoning span.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the chunks that are now complete.
    pub fn push(&mut self, chunk: &str) -> Vec<ReplyChunk> {
        self.pending.push_str(chunk);
        let mut out = Vec::new();
        loop {
            let tag = self.current_tag();
            if let Some(start) = self.pending.find(tag) {
                let before: String = self.pending.drain(..start).collect();
                self.emit(before, &mut out);
                self.pending.drain(..tag.len());
                self.in_reasoning = !self.in_reasoning;
                continue;
            }
            let keep = partial_tag_suffix(&self.pending, tag);
            let release = self.pending.len().saturating_sub(keep);
            let ready: String = self.pending.drain(..release).collect();
            self.emit(ready, &mut out);
            return out;
        }
    }

    /// Flushes any held-back text. A dangling partial tag is literal text.
    pub fn finish(&mut self) -> Vec<ReplyChunk> {
        let rest = std::mem::take(&mut self.pending);
        let mut out = Vec::new();
        self.emit(rest, &mut out);
        out
    }

    const fn current_tag(&self) -> &'static str {
        if self.in_reasoning { CLOSE_TAG } else { OPEN_TAG }
    }

    fn emit(&self, text: String, out: &mut Vec<ReplyChunk>) {
        if text.is_empty() {
            return;
        }
        out.push(if self.in_reasoning {
            ReplyChunk::Reasoning(text)
        } else {
            ReplyChunk::Text(text)
        });
    }
}

/// Length of the longest suffix of `text` that is a proper prefix of `tag`.
fn partial_tag_suffix(text: &str, tag: &str) -> usize {
    (1..tag.len())
        .rev()
        .find(|&len| tag.get(..len).is_some_and(|prefix| text.ends_with(prefix)))
        .unwrap_or(0)
}

/// A completed reply split into what the user sees and what is kept aside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanitizedReply {
    /// Visible text with every reasoning span removed.
    pub content: String,
    /// Reasoning trace, if the model produced one.
    pub reasoning: Option<String>,
}

/// Splits an accumulated reply into visible content and reasoning.
///
/// `reasoning` is trace text that was already separated upstream; any
/// `<think>` span still embedded in `content` is moved next to it. Content
/// is returned untouched when it carries no tags.
///
/// ```
/// use memechat::chat::domain::sanitize_reply;
///
/// let reply = sanitize_reply("<think>hmm</think>\nHello", String::new());
/// assert_eq!(reply.content, "Hello");
/// assert_eq!(reply.reasoning.as_deref(), Some("hmm"));
/// ```
#[must_use]
pub fn sanitize_reply(content: &str, reasoning: String) -> SanitizedReply {
    let mut splitter = ThinkTagSplitter::new();
    let mut chunks = splitter.push(content);
    chunks.extend(splitter.finish());

    let mut visible = String::new();
    let mut trace = reasoning;
    let mut found_tags = false;
    for chunk in chunks {
        match chunk {
            ReplyChunk::Text(text) => visible.push_str(&text),
            ReplyChunk::Reasoning(text) => {
                found_tags = true;
                trace.push_str(&text);
            }
        }
    }
    if found_tags || content.contains(CLOSE_TAG) {
        visible = visible.trim_start().to_owned();
    }

    SanitizedReply {
        content: visible,
        reasoning: (!trace.trim().is_empty()).then_some(trace),
    }
}
