//! Parsing of the administrative `chatbot` command.

/// Subcommands of `<prefix>chatbot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatbotCommand {
    Enable,
    Disable,
    Clear,
    Status,
    Help,
    Unknown(String),
}

/// Classification of an incoming message.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(ChatbotCommand),
    /// A prefixed command owned by something else; never fed to the chatbot.
    Foreign(String),
    Empty,
}

pub fn parse_input(input: &str, prefix: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    match input.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => parse_command(rest),
        _ => Input::Text(input.to_string()),
    }
}

fn parse_command(cmd: &str) -> Input {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    match parts.first().copied() {
        Some("chatbot") => Input::Command(parse_chatbot(parts.get(1).copied())),
        Some(name) => Input::Foreign(name.to_string()),
        None => Input::Foreign(String::new()),
    }
}

fn parse_chatbot(action: Option<&str>) -> ChatbotCommand {
    match action.map(str::to_lowercase).as_deref() {
        Some("enable" | "on") => ChatbotCommand::Enable,
        Some("disable" | "off") => ChatbotCommand::Disable,
        Some("clear" | "reset") => ChatbotCommand::Clear,
        Some("status") => ChatbotCommand::Status,
        None | Some("help") => ChatbotCommand::Help,
        Some(other) => ChatbotCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_input("", "!"), Input::Empty);
        assert_eq!(parse_input("   ", "!"), Input::Empty);
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(
            parse_input("  Hello, world! ", "!"),
            Input::Text("Hello, world!".to_string())
        );
    }

    #[test]
    fn test_parse_chatbot_actions() {
        assert_eq!(
            parse_input("!chatbot enable", "!"),
            Input::Command(ChatbotCommand::Enable)
        );
        assert_eq!(
            parse_input("!chatbot OFF", "!"),
            Input::Command(ChatbotCommand::Disable)
        );
        assert_eq!(
            parse_input("!chatbot clear", "!"),
            Input::Command(ChatbotCommand::Clear)
        );
        assert_eq!(
            parse_input("!chatbot status", "!"),
            Input::Command(ChatbotCommand::Status)
        );
        assert_eq!(
            parse_input("!chatbot", "!"),
            Input::Command(ChatbotCommand::Help)
        );
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(
            parse_input("!chatbot dance", "!"),
            Input::Command(ChatbotCommand::Unknown("dance".to_string()))
        );
    }

    #[test]
    fn test_other_commands_are_foreign() {
        assert_eq!(parse_input("!ban someone", "!"), Input::Foreign("ban".to_string()));
        assert_eq!(parse_input("!", "!"), Input::Foreign(String::new()));
    }

    #[test]
    fn test_multi_char_prefix() {
        assert_eq!(
            parse_input("bot>chatbot status", "bot>"),
            Input::Command(ChatbotCommand::Status)
        );
        assert_eq!(
            parse_input("!chatbot status", "bot>"),
            Input::Text("!chatbot status".to_string())
        );
    }
}
