//! Tailoring error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("invalid range: start={start}, end={end}, len={len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("token counting failed: {0}")]
    CountFailed(String),
}
