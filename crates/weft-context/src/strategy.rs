//! Round-dropping strategies
//!
//! All strategies keep the preserved head and the last round, then drop one
//! non-last round at a time until the kept total fits the budget. They
//! differ only in which round goes first.
//!
//! MiddleOut exists because of positional attention bias ("lost in the
//! middle"): large-context models attend more to boundary content than to
//! mid-sequence content, so removing mid-sequence rounds first minimises the
//! expected quality loss. HeadOut discards the oldest context first,
//! TailOut the most recent non-final context first.

use serde::{Deserialize, Serialize};
use weft_protocol::Message;

use crate::counter::build_prefix_sum;
use crate::rounds::{build_rounds, preserved_head_len, Round};
use crate::tailor::minimum_legal_suffix;
use crate::validate::validate_sequence;
use crate::TokenCounter;

/// Which rounds to sacrifice when a conversation exceeds its budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TailoringStrategy {
    /// Drop the earliest rounds first
    HeadOut,
    /// Drop the latest non-final rounds first
    TailOut,
    /// Drop median rounds first
    #[default]
    MiddleOut,
}

impl TailoringStrategy {
    /// Reduce `messages` so the estimated total fits `max_tokens`.
    ///
    /// The preserved head (leading system run) and the last round survive
    /// the iterative drop loop; when even those exceed the budget the
    /// minimum legal suffix is returned instead. The result is always run
    /// through the sequence validator.
    pub fn tailor(
        &self,
        counter: &dyn TokenCounter,
        messages: &[Message],
        max_tokens: usize,
    ) -> Vec<Message> {
        if messages.is_empty() {
            return Vec::new();
        }

        let prefix = build_prefix_sum(counter, messages);
        let total = prefix[messages.len()];
        if total <= max_tokens {
            return validate_sequence(messages);
        }

        let head = preserved_head_len(messages);
        let rounds = build_rounds(messages, head);
        if rounds.is_empty() {
            return minimum_legal_suffix(counter, messages, max_tokens);
        }

        let round_tokens = |round: &Round| prefix[round.end] - prefix[round.start];
        let head_tokens = prefix[head];

        // The last round is sacred; when head + last round already blow the
        // budget, collapse to the smallest legal tail instead.
        let last = rounds[rounds.len() - 1];
        if head_tokens + round_tokens(&last) > max_tokens {
            return minimum_legal_suffix(counter, messages, max_tokens);
        }

        let mut kept = vec![true; rounds.len()];
        let mut kept_total = head_tokens + rounds.iter().map(round_tokens).sum::<usize>();
        while kept_total > max_tokens {
            let Some(drop) = self.pick_drop(&kept) else {
                break;
            };
            kept[drop] = false;
            kept_total -= round_tokens(&rounds[drop]);
        }

        let mut result: Vec<Message> = messages[..head].to_vec();
        for (round, keep) in rounds.iter().zip(&kept) {
            if *keep {
                result.extend_from_slice(&messages[round.start..round.end]);
            }
        }
        validate_sequence(&result)
    }

    /// Index of the next still-kept non-last round to drop, or `None` when
    /// only the last round remains.
    fn pick_drop(&self, kept: &[bool]) -> Option<usize> {
        let candidates: Vec<usize> = kept[..kept.len() - 1]
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        match self {
            Self::HeadOut => Some(candidates[0]),
            Self::TailOut => Some(candidates[candidates.len() - 1]),
            Self::MiddleOut => Some(candidates[candidates.len() / 2]),
        }
    }
}
