//! Conversation context sent with each chat request.
//!
//! The backend receives a rolling window of the most recent transcript
//! entries, stripped down to role and content.

use saathi_core::config::MAX_HISTORY_LIMIT;
use saathi_core::{ChatMessage, HistoryEntry};

/// Build the history window: the last `limit` messages, oldest first.
///
/// `limit` is clamped to [`MAX_HISTORY_LIMIT`]. The transcript passed in is
/// expected to already include the message being submitted.
pub fn history_window(transcript: &[ChatMessage], limit: usize) -> Vec<HistoryEntry> {
    let limit = limit.min(MAX_HISTORY_LIMIT);
    let start = transcript.len().saturating_sub(limit);
    transcript[start..]
        .iter()
        .map(ChatMessage::to_history)
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use saathi_core::Role;

    fn transcript(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("q{}", i))
                } else {
                    ChatMessage::assistant(format!("a{}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_short_transcript_is_sent_whole() {
        let msgs = transcript(3);
        let window = history_window(&msgs, 10);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "q0");
        assert_eq!(window[2].content, "q2");
    }

    #[test]
    fn test_window_keeps_most_recent() {
        let msgs = transcript(15);
        let window = history_window(&msgs, 10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "a5");
        assert_eq!(window[9].content, "q14");
        assert_eq!(window[9].role, Role::User);
    }

    #[test]
    fn test_limit_is_clamped() {
        let msgs = transcript(30);
        assert_eq!(history_window(&msgs, 50).len(), MAX_HISTORY_LIMIT);
        assert_eq!(history_window(&msgs, 4).len(), 4);
    }

    #[test]
    fn test_empty_transcript() {
        assert!(history_window(&[], 10).is_empty());
        assert!(history_window(&transcript(5), 0).is_empty());
    }
}
