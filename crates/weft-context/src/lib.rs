//! Weft Context - Token budgeting and conversation tailoring
//!
//! This crate is the model layer's tailoring core:
//! - Token estimation for messages and ranges
//! - Input/output budget derivation from a model's context window
//! - Message-sequence legality fix-up for strict chat endpoints
//! - Round-based trimming strategies (head-out, tail-out, middle-out)
//!
//! Every provider adapter funnels its requests through [`TokenTailor`]
//! before hitting the wire.

mod budget;
mod counter;
mod error;
mod rounds;
mod strategy;
mod tailor;
mod validate;

pub use budget::{
    max_input_tokens, max_output_tokens, resolve_context_window, TokenTailoringConfig,
    DEFAULT_CONTEXT_WINDOW,
};
pub use counter::{
    build_prefix_sum, SimpleTokenCounter, TokenCounter, DEFAULT_RUNES_PER_TOKEN,
};
pub use error::TailorError;
pub use rounds::{build_rounds, preserved_head_len, Round};
pub use strategy::TailoringStrategy;
pub use tailor::TokenTailor;
pub use validate::validate_sequence;
