use super::chat_message::{ChatMessage, ChatReply};

/// Ordered chat transcript with at most one pending assistant placeholder
/// per outstanding request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatLogState {
    messages: Vec<ChatMessage>,
    /// Lines scrolled up from the bottom; zero means "follow newest".
    scroll_back: usize,
}

impl ChatLogState {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(ChatMessage::user(text));
    }

    pub fn push_loading(&mut self) {
        self.push(ChatMessage::loading());
    }

    /// Removes the oldest loading placeholder and appends the final reply.
    ///
    /// Replies land in submission order because the worker runs jobs
    /// sequentially, so the oldest placeholder is always the one that
    /// belongs to this reply.
    pub fn resolve_loading(&mut self, reply: ChatReply) {
        if let Some(index) = self.messages.iter().position(|message| message.is_loading) {
            self.messages.remove(index);
        }

        self.push(reply.into_message());
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|message| message.is_loading)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Clamps the scroll position to the rendered content height.
    pub fn clamp_scroll(&mut self, max_scroll_back: usize) {
        self.scroll_back = self.scroll_back.min(max_scroll_back);
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.scroll_back = 0;
    }
}
