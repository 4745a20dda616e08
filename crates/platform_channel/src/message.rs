use std::fmt;

/// Opaque binary message body. `None` means "no payload", which is also the
/// empty reply.
pub type Payload = Option<Vec<u8>>;

/// One-shot reply hook handed along with every message.
///
/// Being `FnOnce`, a callback can fire at most once; the router makes sure it
/// fires at least once.
pub type ReplyCallback = Box<dyn FnOnce(Payload) + Send + 'static>;

/// Direction of the message that was in flight when a failure was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageOrigin {
    /// The framework called into a plugin handler.
    FrameworkToPlugin,
    /// A plugin sent a message to the framework and the reply could not be delivered.
    PluginToFramework,
}

impl MessageOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageOrigin::FrameworkToPlugin => "framework-to-plugin message",
            MessageOrigin::PluginToFramework => "plugin-to-framework message",
        }
    }
}

impl fmt::Display for MessageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "during a {}", self.as_str())
    }
}

/// Renders a payload for logs and the CLI: UTF-8 text when it is, a byte count otherwise.
pub fn describe_payload(payload: &Payload) -> String {
    match payload {
        None => "<empty>".to_string(),
        Some(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => format!("<{} bytes>", bytes.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_renders_as_context_description() {
        assert_eq!(
            MessageOrigin::FrameworkToPlugin.to_string(),
            "during a framework-to-plugin message"
        );
        assert_eq!(
            MessageOrigin::PluginToFramework.to_string(),
            "during a plugin-to-framework message"
        );
    }

    #[test]
    fn describe_payload_prefers_text() {
        assert_eq!(describe_payload(&None), "<empty>");
        assert_eq!(describe_payload(&Some(b"pong".to_vec())), "pong");
        assert_eq!(describe_payload(&Some(vec![0xff, 0xfe])), "<2 bytes>");
    }
}
