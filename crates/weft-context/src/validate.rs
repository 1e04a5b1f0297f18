//! Message-sequence legality fix-up
//!
//! Strict chat endpoints reject empty content, dangling assistant turns, and
//! role interleavings that break user/assistant alternation. Tailoring
//! strategies are free to drop whole rounds; this pass repairs whatever is
//! left so the request stays syntactically legal.

use weft_protocol::{Message, Role};

/// Turn an arbitrary message sequence into one legal for strict chat
/// endpoints.
///
/// The result keeps the relative order of every retained message, never
/// contains an empty-content message, and ends with a user or tool message
/// whenever it is non-empty. Idempotent.
pub fn validate_sequence(messages: &[Message]) -> Vec<Message> {
    // Unknown roles are dropped, empty content becomes a single-space
    // placeholder when the message still carries payload.
    let mut cleaned: Vec<Message> = Vec::with_capacity(messages.len());
    for message in messages {
        if !message.role.is_valid() {
            continue;
        }
        if message.content.is_empty() {
            if !message.has_payload() {
                continue;
            }
            let mut fixed = message.clone();
            fixed.content = " ".to_string();
            cleaned.push(fixed);
            continue;
        }
        cleaned.push(message.clone());
    }

    // System-only prefix, then user-anchored segments over the remainder.
    let prefix_len = cleaned
        .iter()
        .take_while(|m| m.role == Role::System)
        .count();
    let body = &cleaned[prefix_len..];

    let mut result: Vec<Message> = cleaned[..prefix_len].to_vec();
    for segment in split_segments(body) {
        if segment_is_valid(segment) {
            result.extend_from_slice(segment);
        }
    }

    // Trailing fix-up: no system or assistant tail is legal.
    while result.last().is_some_and(|m| m.role == Role::System) {
        result.pop();
    }
    while result.last().is_some_and(|m| m.role == Role::Assistant) {
        result.pop();
    }
    match result.last().map(|m| m.role) {
        Some(Role::User) | Some(Role::Tool) => result,
        _ => Vec::new(),
    }
}

/// Split a prefix-free body into segments, each starting at a user message
/// that is not immediately preceded by another user message. Whatever sits
/// before the first such user forms a leading segment of its own.
fn split_segments<'a>(body: &'a [Message]) -> impl Iterator<Item = &'a [Message]> + 'a {
    let mut boundaries = vec![0];
    for i in 0..body.len() {
        if i > 0 && body[i].role == Role::User && body[i - 1].role != Role::User {
            boundaries.push(i);
        }
    }
    boundaries.push(body.len());

    (0..boundaries.len() - 1)
        .map(move |k| &body[boundaries[k]..boundaries[k + 1]])
        .filter(|segment| !segment.is_empty())
}

/// A segment is a valid round iff its first non-system message is a user.
/// Alternation between the user/tool side and the assistant side then holds
/// by construction: any later user that follows a non-user message starts a
/// new segment, so a segment is one block of users followed by replies.
fn segment_is_valid(segment: &[Message]) -> bool {
    segment
        .iter()
        .find(|m| m.role != Role::System)
        .is_some_and(|m| m.role == Role::User)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_protocol::ToolCall;

    fn roles(messages: &[Message]) -> Vec<Role> {
        messages.iter().map(|m| m.role).collect()
    }

    #[test]
    fn test_simple_sequence_unchanged() {
        let msgs = vec![Message::system("S"), Message::user("Q")];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::System, Role::User]);
        assert_eq!(out[1].content, "Q");
    }

    #[test]
    fn test_orphan_leading_tool_dropped() {
        let msgs = vec![
            Message::system("S"),
            Message::tool_result("id1", "search", "r1"),
            Message::user("X"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::System, Role::User]);
        assert_eq!(out[1].content, "X");
    }

    #[test]
    fn test_trailing_assistants_removed() {
        let msgs = vec![
            Message::system("S"),
            Message::user("q"),
            Message::assistant("a1"),
            Message::assistant("a2"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::System, Role::User]);
    }

    #[test]
    fn test_unknown_role_dropped() {
        let mut bot = Message::user("beep");
        bot.role = Role::Unknown;
        let msgs = vec![Message::user("q"), bot, Message::assistant("a"), Message::user("q2")];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::User, Role::Assistant, Role::User]);
    }

    #[test]
    fn test_empty_content_with_tool_calls_gets_placeholder() {
        let call = ToolCall::function("call_1", "search", "{}");
        let msgs = vec![
            Message::user("q"),
            Message::assistant_with_tool_calls("", vec![call]),
            Message::tool_result("call_1", "search", "result"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1].content, " ");
        assert!(!out.iter().any(|m| m.content.is_empty()));
    }

    #[test]
    fn test_empty_content_without_payload_dropped() {
        let msgs = vec![Message::user("q"), Message::assistant(""), Message::user("q2")];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::User, Role::User]);
    }

    #[test]
    fn test_system_only_input_yields_empty() {
        let msgs = vec![Message::system("a"), Message::system("b")];
        assert!(validate_sequence(&msgs).is_empty());
    }

    #[test]
    fn test_trailing_system_removed() {
        let msgs = vec![Message::user("q"), Message::system("late instructions")];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::User]);
    }

    #[test]
    fn test_consecutive_tool_results_keep_order() {
        let calls = vec![
            ToolCall::function("c1", "a", "{}"),
            ToolCall::function("c2", "b", "{}"),
        ];
        let msgs = vec![
            Message::user("q"),
            Message::assistant_with_tool_calls("calling", calls),
            Message::tool_result("c1", "a", "first"),
            Message::tool_result("c2", "b", "second"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(out.len(), 4);
        assert_eq!(out[2].tool_id.as_deref(), Some("c1"));
        assert_eq!(out[3].tool_id.as_deref(), Some("c2"));
    }

    #[test]
    fn test_system_inside_round_kept_with_round() {
        let msgs = vec![
            Message::user("q1"),
            Message::assistant("a1"),
            Message::system("mid-round note"),
            Message::user("q2"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(
            roles(&out),
            vec![Role::User, Role::Assistant, Role::System, Role::User]
        );
    }

    #[test]
    fn test_leading_assistant_segment_dropped() {
        let msgs = vec![
            Message::assistant("unprompted"),
            Message::user("q"),
            Message::assistant("a"),
            Message::user("q2"),
        ];
        let out = validate_sequence(&msgs);
        assert_eq!(roles(&out), vec![Role::User, Role::Assistant, Role::User]);
    }

    #[test]
    fn test_empty_input() {
        assert!(validate_sequence(&[]).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let call = ToolCall::function("c1", "t", "{}");
        let msgs = vec![
            Message::system("S"),
            Message::tool_result("x", "y", "orphan"),
            Message::user("q"),
            Message::assistant_with_tool_calls("", vec![call]),
            Message::tool_result("c1", "t", "out"),
            Message::assistant("done"),
            Message::user("next"),
        ];
        let once = validate_sequence(&msgs);
        let twice = validate_sequence(&once);
        assert_eq!(roles(&once), roles(&twice));
        let once_contents: Vec<_> = once.iter().map(|m| m.content.clone()).collect();
        let twice_contents: Vec<_> = twice.iter().map(|m| m.content.clone()).collect();
        assert_eq!(once_contents, twice_contents);
    }
}
