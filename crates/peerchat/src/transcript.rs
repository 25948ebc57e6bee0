use defs::ChatMessage;

pub const LOCAL_SENDER: &str = "me";
pub const SYSTEM_SENDER: &str = "system";

/// Chat lines shown this session, oldest first. Lives only in memory.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn local(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(LOCAL_SENDER, text))
    }

    pub fn system(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(SYSTEM_SENDER, text))
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
