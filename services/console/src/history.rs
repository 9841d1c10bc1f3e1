use catena_common::types::ChatMessage;

/// Append-only exchange log for one session. The gateway is stateless, so
/// the full ordered history is sent back on every call to give the remote
/// API context for each turn. Never persisted; dropped with the session.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The full ordered sequence, included verbatim in the next request.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catena_common::types::Role;

    #[test]
    fn starts_empty() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut history = ConversationHistory::new();
        history.push(ChatMessage::user("first"));
        history.push(ChatMessage::assistant("second"));
        history.push(ChatMessage::user("third"));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].content, "first");
        assert_eq!(snapshot[0].role, Role::User);
        assert_eq!(snapshot[1].content, "second");
        assert_eq!(snapshot[1].role, Role::Assistant);
        assert_eq!(snapshot[2].content, "third");
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let mut history = ConversationHistory::new();
        history.push(ChatMessage::user("same"));
        history.push(ChatMessage::user("same"));
        assert_eq!(history.len(), 2);
    }
}
