//! Query text sent to an agent, with recent conversation replayed

use crate::domain::Message;

/// Number of prior messages replayed with each query
pub const HISTORY_WINDOW: usize = 5;

/// `"{Role}: {content}"` lines for the last few messages, oldest first
pub fn history_block(prior: &[Message]) -> String {
    let start = prior.len().saturating_sub(HISTORY_WINDOW);
    prior[start..]
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Query for `message` given the messages that preceded it
pub fn build_query(prior: &[Message], message: &str) -> String {
    let history = history_block(prior);
    if history.is_empty() {
        message.to_string()
    } else {
        format!("Chat history:\n{}\n\nNew message:\n{}", history, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Message::user(format!("q{}", i))
                } else {
                    Message::assistant(format!("a{}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_first_message_is_sent_bare() {
        assert_eq!(build_query(&[], "hello"), "hello");
    }

    #[test]
    fn test_only_last_five_are_replayed() {
        let prior = conversation(7);
        let query = build_query(&prior, "next");
        assert_eq!(
            query,
            "Chat history:\nUser: q2\nAssistant: a3\nUser: q4\nAssistant: a5\nUser: q6\n\nNew message:\nnext"
        );
    }

    #[test]
    fn test_short_history() {
        let prior = conversation(2);
        assert_eq!(history_block(&prior), "User: q0\nAssistant: a1");
    }
}
