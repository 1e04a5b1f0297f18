//! Per-request token budget derivation
//!
//! Budgets are derived from the model's context window: the input budget
//! leaves room for reserved output, protocol overhead, and a safety margin;
//! the output budget is whatever remains after the actual input.

use serde::{Deserialize, Serialize};

/// Context window assumed for model names the lookup does not recognize
pub const DEFAULT_CONTEXT_WINDOW: usize = 32_768;

/// Tuning knobs for budget derivation. Immutable for the lifetime of a
/// model adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenTailoringConfig {
    /// Tokens consumed by request framing the counter cannot see
    pub protocol_overhead_tokens: usize,
    /// Output room withheld when deriving the input budget
    pub reserve_output_tokens: usize,
    /// Lower bound on the derived input budget
    pub input_tokens_floor: usize,
    /// Lower bound on the derived output budget
    pub output_tokens_floor: usize,
    /// Fraction of the context window kept free, in (0, 1)
    pub safety_margin_ratio: f64,
    /// Cap on the input budget as a fraction of the window, in (0, 1]
    pub max_input_tokens_ratio: f64,
}

impl Default for TokenTailoringConfig {
    fn default() -> Self {
        Self {
            protocol_overhead_tokens: 512,
            reserve_output_tokens: 2048,
            input_tokens_floor: 1024,
            output_tokens_floor: 256,
            safety_margin_ratio: 0.10,
            max_input_tokens_ratio: 1.0,
        }
    }
}

/// Maximum input tokens for a request against the given context window.
pub fn max_input_tokens(context_window: usize, config: &TokenTailoringConfig) -> usize {
    let margin = (context_window as f64 * config.safety_margin_ratio) as i64;
    let remaining = context_window as i64
        - config.reserve_output_tokens as i64
        - config.protocol_overhead_tokens as i64
        - margin;
    let cap = (context_window as f64 * config.max_input_tokens_ratio) as i64;
    remaining.min(cap).max(config.input_tokens_floor as i64) as usize
}

/// Maximum output tokens once `used_input_tokens` of the window are spent.
/// Returns 0 when nothing remains; the floor applies only to a strictly
/// positive remainder.
pub fn max_output_tokens(
    context_window: usize,
    used_input_tokens: usize,
    config: &TokenTailoringConfig,
) -> usize {
    let margin = (context_window as f64 * config.safety_margin_ratio) as i64;
    let remaining = context_window as i64
        - used_input_tokens as i64
        - config.protocol_overhead_tokens as i64
        - margin;
    if remaining > 0 {
        remaining.max(config.output_tokens_floor as i64) as usize
    } else {
        0
    }
}

/// Published context windows, matched by model-name prefix.
const CONTEXT_WINDOWS: &[(&str, usize)] = &[
    ("gpt-4.1", 1_047_576),
    ("gpt-4o", 128_000),
    ("gpt-4-turbo", 128_000),
    ("gpt-4", 8_192),
    ("gpt-3.5-turbo", 16_385),
    ("o1", 200_000),
    ("o3", 200_000),
    ("o4-mini", 200_000),
    ("claude", 200_000),
    ("gemini-1.5-pro", 2_097_152),
    ("gemini-1.5", 1_048_576),
    ("gemini-2", 1_048_576),
    ("deepseek", 65_536),
    ("qwen", 131_072),
    ("llama-3.1", 131_072),
    ("llama3", 8_192),
];

/// Context window for a model name, by longest matching prefix.
/// Unknown names resolve to [`DEFAULT_CONTEXT_WINDOW`].
pub fn resolve_context_window(model_name: &str) -> usize {
    CONTEXT_WINDOWS
        .iter()
        .filter(|(prefix, _)| model_name.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|&(_, window)| window)
        .unwrap_or(DEFAULT_CONTEXT_WINDOW)
}
