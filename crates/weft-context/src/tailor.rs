//! Tailoring orchestrator
//!
//! Public entry point of the core: count, decide, tailor, revalidate, and
//! write the output budget back into the request. Counter failures never
//! surface as errors here; they degrade to the heuristic counter or leave
//! the input untouched, so the orchestrator can never claim a sequence is
//! smaller than it is.

use std::sync::Arc;

use weft_protocol::{Message, Request, Role};

use crate::budget::{max_input_tokens, max_output_tokens, resolve_context_window};
use crate::counter::build_prefix_sum;
use crate::rounds::preserved_head_len;
use crate::validate::validate_sequence;
use crate::{SimpleTokenCounter, TailoringStrategy, TokenCounter, TokenTailoringConfig};

/// Tailors conversation histories to a model's input budget.
///
/// A pure, synchronous transformation: no I/O, no locks, safe to run from
/// many threads at once as long as the counter is.
pub struct TokenTailor {
    counter: Arc<dyn TokenCounter>,
    strategy: TailoringStrategy,
    config: TokenTailoringConfig,
    /// Caller override; when unset the budget derives from the model's
    /// context window.
    max_input_tokens: Option<usize>,
}

impl TokenTailor {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(SimpleTokenCounter::new()),
            strategy: TailoringStrategy::default(),
            config: TokenTailoringConfig::default(),
            max_input_tokens: None,
        }
    }

    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counter = counter;
        self
    }

    pub fn with_strategy(mut self, strategy: TailoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_config(mut self, config: TokenTailoringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_input_tokens(mut self, max_input_tokens: usize) -> Self {
        self.max_input_tokens = Some(max_input_tokens);
        self
    }

    /// Reduce `messages` to fit `max_input_tokens`.
    ///
    /// Returns a new list; the input is never mutated. A zero budget yields
    /// an empty list. When the configured counter fails up front the input
    /// is returned unchanged rather than tailored against a bad estimate.
    pub fn tailor(&self, messages: &[Message], max_input_tokens: usize) -> Vec<Message> {
        if messages.is_empty() || max_input_tokens == 0 {
            return Vec::new();
        }

        let total = match self.counter.count_range(messages, 0, messages.len()) {
            Ok(total) => total,
            Err(err) => {
                tracing::warn!(error = %err, "pre-tailor token count failed, leaving sequence unchanged");
                return messages.to_vec();
            }
        };
        if total <= max_input_tokens {
            return validate_sequence(messages);
        }

        let tailored = self
            .strategy
            .tailor(self.counter.as_ref(), messages, max_input_tokens);
        if tailored.is_empty() {
            return tailored;
        }

        // The strategy validates its own output; recount and collapse to the
        // minimum legal suffix when round-dropping was not enough.
        let used = total_tokens(self.counter.as_ref(), &tailored);
        if used > max_input_tokens {
            return minimum_legal_suffix(self.counter.as_ref(), messages, max_input_tokens);
        }
        tailored
    }

    /// Tailor `request.messages` in place against `model_name`'s context
    /// window and derive `max_tokens` for the output when the caller has
    /// not set one.
    pub fn apply(&self, model_name: &str, request: &mut Request) {
        if request.messages.is_empty() {
            return;
        }

        let context_window = resolve_context_window(model_name);
        let max_input = self
            .max_input_tokens
            .unwrap_or_else(|| max_input_tokens(context_window, &self.config));
        tracing::debug!(
            model = model_name,
            context_window,
            max_input,
            "resolved input token budget"
        );

        request.messages = self.tailor(&request.messages, max_input);
        if request.messages.is_empty() {
            return;
        }

        let used = match self
            .counter
            .count_range(&request.messages, 0, request.messages.len())
        {
            Ok(used) => used,
            Err(err) => {
                tracing::warn!(error = %err, "token recount failed after tailoring, output budget left unset");
                return;
            }
        };

        if request.generation.max_tokens.is_none() {
            let max_output = max_output_tokens(context_window, used, &self.config);
            if max_output > 0 {
                request.generation.max_tokens = Some(max_output);
                tracing::debug!(
                    context_window,
                    used,
                    max_output,
                    "derived output token budget"
                );
            }
        }
    }
}

impl Default for TokenTailor {
    fn default() -> Self {
        Self::new()
    }
}

fn total_tokens(counter: &dyn TokenCounter, messages: &[Message]) -> usize {
    let prefix = build_prefix_sum(counter, messages);
    prefix[messages.len()]
}

/// The shortest legal tail of the conversation, optionally prefixed by the
/// preserved head.
///
/// Finds the last non-system message, steps back over trailing assistants,
/// walks a trailing tool result back to its initiating user, then offers
/// `head + slice` and `slice` to the validator. The first candidate that
/// fits the budget wins; when neither does, the unvalidated without-head
/// slice comes back as a best effort, which may still exceed the budget.
pub(crate) fn minimum_legal_suffix(
    counter: &dyn TokenCounter,
    messages: &[Message],
    max_tokens: usize,
) -> Vec<Message> {
    let head = preserved_head_len(messages);

    let Some(mut last) = messages.iter().rposition(|m| m.role != Role::System) else {
        return Vec::new();
    };
    // Step back over trailing assistants, and over systems the walk uncovers.
    while matches!(messages[last].role, Role::Assistant | Role::System) {
        if last == 0 {
            return Vec::new();
        }
        last -= 1;
    }

    let start = if messages[last].role == Role::Tool {
        messages[..last]
            .iter()
            .rposition(|m| m.role == Role::User)
            .unwrap_or(last)
    } else {
        last
    };

    let slice = &messages[start..=last];
    let mut with_head: Vec<Message> = messages[..head].to_vec();
    with_head.extend_from_slice(slice);
    let without: Vec<Message> = slice.to_vec();

    for candidate in [validate_sequence(&with_head), validate_sequence(&without)] {
        if total_tokens(counter, &candidate) <= max_tokens {
            return candidate;
        }
    }
    without
}
