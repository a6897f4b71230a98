//! Conversation module - the chat transcript sent to a model
//!
//! Mirrors the shape of function-calling chat APIs: system and user turns,
//! assistant turns that may carry tool calls, and tool turns that answer a
//! specific call by id.

use serde::{Deserialize, Serialize};

/// A function call made (or simulated) by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier a tool turn refers back to
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Arguments as a JSON document
    pub arguments: String,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Instructions for the model
    System {
        /// Instruction text
        content: String,
    },
    /// Text typed by a user
    User {
        /// Query text
        content: String,
    },
    /// A model turn, possibly calling tools
    Assistant {
        /// Free text, usually empty when tools are called
        content: String,
        /// Tool calls made in this turn
        tool_calls: Vec<ToolCall>,
    },
    /// The result of a tool call
    Tool {
        /// Tool output
        content: String,
        /// Id of the call this answers
        tool_call_id: String,
    },
}

impl Message {
    /// Wire name of the message role
    pub fn role(&self) -> &'static str {
        match self {
            Message::System { .. } => "system",
            Message::User { .. } => "user",
            Message::Assistant { .. } => "assistant",
            Message::Tool { .. } => "tool",
        }
    }

    /// Text content of the turn
    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content, .. }
            | Message::Tool { content, .. } => content,
        }
    }
}

/// A tool the model may call, described by a JSON schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name; the model echoes it back in its call
    pub name: String,
    /// What the tool extracts
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: serde_json::Value,
}

/// An ordered list of turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All turns in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether there are no turns
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the final user turn, which is the query being asked
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::User { content } => Some(content.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_user_text() {
        let mut conversation = Conversation::new();
        assert_eq!(conversation.last_user_text(), None);

        conversation.push(Message::System { content: "sys".into() });
        conversation.push(Message::User { content: "first".into() });
        conversation.push(Message::Tool {
            content: "ok".into(),
            tool_call_id: "call_1".into(),
        });
        conversation.push(Message::User { content: "second".into() });

        assert_eq!(conversation.last_user_text(), Some("second"));
        assert_eq!(conversation.len(), 4);
        assert_eq!(conversation.messages()[2].role(), "tool");
    }
}
