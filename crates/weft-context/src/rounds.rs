//! User-anchored rounds, the atomic unit of trimming
//!
//! A round is a user turn plus the replies that follow it. Dropping whole
//! rounds is the one removal policy that cannot split a tool-call/result
//! pair or break user/assistant alternation, which frees the strategies to
//! drop any subset of rounds.

use weft_protocol::{Message, Role};

/// Half-open `[start, end)` index range over the full message list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    pub start: usize,
    pub end: usize,
}

impl Round {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Length of the maximal leading run of system messages. These are never
/// trimmed.
pub fn preserved_head_len(messages: &[Message]) -> usize {
    messages
        .iter()
        .take_while(|m| m.role == Role::System)
        .count()
}

/// Partition everything after the preserved head into rounds.
///
/// A round opens at each user message that is the first user after an
/// assistant. When the region holds no assistant at all, every user opens a
/// round, so a user-only history can still be trimmed round by round.
/// System messages inside the region join the enclosing round. Messages
/// before the first anchor belong to no round and are left for the
/// validator to reject.
pub fn build_rounds(messages: &[Message], preserved_head: usize) -> Vec<Round> {
    let region = &messages[preserved_head..];
    let has_assistant = region.iter().any(|m| m.role == Role::Assistant);

    let mut rounds: Vec<Round> = Vec::new();
    let mut assistant_since_anchor = false;
    for (offset, message) in region.iter().enumerate() {
        let index = preserved_head + offset;
        match message.role {
            Role::User => {
                if rounds.is_empty() || !has_assistant || assistant_since_anchor {
                    if let Some(open) = rounds.last_mut() {
                        open.end = index;
                    }
                    rounds.push(Round {
                        start: index,
                        end: messages.len(),
                    });
                    assistant_since_anchor = false;
                }
            }
            Role::Assistant => assistant_since_anchor = true,
            _ => {}
        }
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_protocol::ToolCall;

    #[test]
    fn test_preserved_head() {
        let msgs = vec![
            Message::system("a"),
            Message::system("b"),
            Message::user("q"),
            Message::system("late"),
        ];
        assert_eq!(preserved_head_len(&msgs), 2);
        assert_eq!(preserved_head_len(&[Message::user("q")]), 0);
        assert_eq!(preserved_head_len(&[]), 0);
    }

    #[test]
    fn test_basic_rounds() {
        let msgs = vec![
            Message::system("S"),
            Message::user("A"),
            Message::assistant("a1"),
            Message::user("B"),
            Message::assistant("a2"),
            Message::user("C"),
        ];
        let rounds = build_rounds(&msgs, 1);
        assert_eq!(
            rounds,
            vec![
                Round { start: 1, end: 3 },
                Round { start: 3, end: 5 },
                Round { start: 5, end: 6 },
            ]
        );
    }

    #[test]
    fn test_consecutive_users_share_round() {
        let msgs = vec![
            Message::user("q1"),
            Message::user("q1-more"),
            Message::assistant("a"),
            Message::user("q2"),
        ];
        let rounds = build_rounds(&msgs, 0);
        assert_eq!(
            rounds,
            vec![Round { start: 0, end: 3 }, Round { start: 3, end: 4 }]
        );
    }

    #[test]
    fn test_user_only_history_splits_per_user() {
        let msgs = vec![Message::user("a"), Message::user("b"), Message::user("c")];
        let rounds = build_rounds(&msgs, 0);
        assert_eq!(rounds.len(), 3);
        assert_eq!(rounds[1], Round { start: 1, end: 2 });
    }

    #[test]
    fn test_tool_turns_stay_in_round() {
        let call = ToolCall::function("c1", "t", "{}");
        let msgs = vec![
            Message::user("q"),
            Message::assistant_with_tool_calls(" ", vec![call]),
            Message::tool_result("c1", "t", "out"),
            Message::assistant("final"),
            Message::user("next"),
        ];
        let rounds = build_rounds(&msgs, 0);
        assert_eq!(
            rounds,
            vec![Round { start: 0, end: 4 }, Round { start: 4, end: 5 }]
        );
    }

    #[test]
    fn test_mid_region_system_joins_round() {
        let msgs = vec![
            Message::system("S"),
            Message::user("q1"),
            Message::assistant("a1"),
            Message::system("note"),
            Message::user("q2"),
        ];
        let rounds = build_rounds(&msgs, 1);
        assert_eq!(
            rounds,
            vec![Round { start: 1, end: 4 }, Round { start: 4, end: 5 }]
        );
    }

    #[test]
    fn test_no_users_no_rounds() {
        let msgs = vec![Message::system("S"), Message::assistant("a")];
        assert!(build_rounds(&msgs, 1).is_empty());
    }
}
