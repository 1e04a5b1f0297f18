//! Token counting for messages
//!
//! The default counter is a rune-length heuristic: model-agnostic, cheap,
//! and monotone over message concatenation, which is what prefix-sum based
//! trimming relies on. Accurate (e.g. BPE-based) counters can be plugged in
//! through the [`TokenCounter`] trait as long as they stay non-negative and
//! monotone.

use weft_protocol::{ContentPart, Message};

use crate::TailorError;

/// Default rune-to-token ratio for the heuristic counter
pub const DEFAULT_RUNES_PER_TOKEN: f64 = 4.0;

/// Counts tokens for messages.
///
/// Implementations must be safe for concurrent read-only use.
pub trait TokenCounter: Send + Sync {
    /// Estimated token count for a single message.
    fn count(&self, message: &Message) -> Result<usize, TailorError>;

    /// Estimated token count for `messages[start..end]`.
    fn count_range(
        &self,
        messages: &[Message],
        start: usize,
        end: usize,
    ) -> Result<usize, TailorError> {
        if end > messages.len() || start >= end {
            return Err(TailorError::InvalidRange {
                start,
                end,
                len: messages.len(),
            });
        }
        let mut total = 0;
        for message in &messages[start..end] {
            total += self.count(message)?;
        }
        Ok(total)
    }
}

/// Rough token estimation based on rune length (~4 runes per token).
#[derive(Debug, Clone)]
pub struct SimpleTokenCounter {
    runes_per_token: f64,
}

impl SimpleTokenCounter {
    pub fn new() -> Self {
        Self {
            runes_per_token: DEFAULT_RUNES_PER_TOKEN,
        }
    }

    /// Ratios of zero or below fall back to the default.
    pub fn with_runes_per_token(runes_per_token: f64) -> Self {
        let runes_per_token = if runes_per_token > 0.0 {
            runes_per_token
        } else {
            DEFAULT_RUNES_PER_TOKEN
        };
        Self { runes_per_token }
    }

    /// Infallible estimate for one message.
    ///
    /// Sums rune counts of content, reasoning, text content-parts, and each
    /// tool call's identifying fields, then divides by the ratio truncating
    /// toward zero. Messages that carry any countable text estimate at
    /// least 1.
    pub fn estimate(&self, message: &Message) -> usize {
        let mut runes = message.content.chars().count();

        if let Some(reasoning) = &message.reasoning_content {
            runes += reasoning.chars().count();
        }

        for part in &message.content_parts {
            if let ContentPart::Text { text } = part {
                runes += text.chars().count();
            }
        }

        for call in &message.tool_calls {
            runes += call.call_type.chars().count();
            runes += call.id.chars().count();
            runes += call.function.name.chars().count();
            if let Some(description) = &call.function.description {
                runes += description.chars().count();
            }
            runes += call.function.arguments.chars().count();
        }

        let total = (runes as f64 / self.runes_per_token) as usize;
        if total == 0 && message.has_countable_text() {
            1
        } else {
            total
        }
    }
}

impl Default for SimpleTokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for SimpleTokenCounter {
    fn count(&self, message: &Message) -> Result<usize, TailorError> {
        Ok(self.estimate(message))
    }
}

/// Build a prefix-sum array of per-message token estimates.
///
/// `prefix[0] == 0` and `prefix[i + 1] == prefix[i] + tokens(messages[i])`,
/// so any contiguous total is `prefix[end] - prefix[start]`. When the
/// pluggable counter fails on a message, its estimate degrades to the
/// simple counter rather than aborting the build.
pub fn build_prefix_sum(counter: &dyn TokenCounter, messages: &[Message]) -> Vec<usize> {
    let fallback = SimpleTokenCounter::new();
    let mut prefix = vec![0; messages.len() + 1];
    for (i, message) in messages.iter().enumerate() {
        let tokens = match counter.count(message) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::warn!(index = i, error = %err, "token count failed, using fallback estimate");
                fallback.estimate(message)
            }
        };
        prefix[i + 1] = prefix[i] + tokens;
    }
    prefix
}
