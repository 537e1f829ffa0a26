/// Commands understood by the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandType {
    Search,     // /search [keyword] - fresh search, optionally with a new keyword
    Presets,    // /presets - list recommended keywords
    Preset,     // /preset <category> <n> - search a recommended keyword
    Next,       // /next - next page
    Prev,       // /prev - previous page
    Export,     // /export <n> - save record n as XML
    Link,       // /link <n> - open record n in the archive viewer
    Cancel,     // /cancel - abort the latest request
    Help,       // /help
    Quit,       // /quit
    Keyword,    // plain text - keyword edit
    Unknown,    // Unrecognized command
}

impl CommandType {
    /// Parse command type from prefix
    pub fn from_prefix(prefix: &str) -> Self {
        match prefix.to_lowercase().as_str() {
            "\\search" | "/search" | "\\s" | "/s" => CommandType::Search,
            "\\presets" | "/presets" | "\\kw" | "/kw" => CommandType::Presets,
            "\\preset" | "/preset" | "\\p" | "/p" => CommandType::Preset,
            "\\next" | "/next" | "\\n" | "/n" => CommandType::Next,
            "\\prev" | "/prev" | "\\b" | "/b" => CommandType::Prev,
            "\\export" | "/export" | "\\x" | "/x" => CommandType::Export,
            "\\link" | "/link" | "\\l" | "/l" => CommandType::Link,
            "\\cancel" | "/cancel" => CommandType::Cancel,
            "\\help" | "/help" | "\\h" | "/h" => CommandType::Help,
            "\\quit" | "/quit" | "\\q" | "/q" | "/exit" => CommandType::Quit,
            _ => CommandType::Unknown,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &str {
        match self {
            CommandType::Search => "search",
            CommandType::Presets => "presets",
            CommandType::Preset => "preset",
            CommandType::Next => "next",
            CommandType::Prev => "prev",
            CommandType::Export => "export",
            CommandType::Link => "link",
            CommandType::Cancel => "cancel",
            CommandType::Help => "help",
            CommandType::Quit => "quit",
            CommandType::Keyword => "keyword",
            CommandType::Unknown => "unknown",
        }
    }
}

/// Parsed command structure
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub command_type: CommandType,
    pub raw_text: String,
    pub arguments: String,
}

impl ParsedCommand {
    /// Parse one input line into a command
    ///
    /// # Examples
    /// ```
    /// use yeonhaeng_frontend::command::{CommandType, ParsedCommand};
    ///
    /// let cmd = ParsedCommand::parse("/preset 날씨 2");
    /// assert_eq!(cmd.command_type, CommandType::Preset);
    /// assert_eq!(cmd.arguments, "날씨 2");
    /// ```
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Some((prefix, rest)) = Self::extract_prefix(trimmed) {
            ParsedCommand {
                command_type: CommandType::from_prefix(prefix),
                raw_text: trimmed.to_string(),
                arguments: rest.trim().to_string(),
            }
        } else {
            // Not a command, the whole line is a keyword
            ParsedCommand {
                command_type: CommandType::Keyword,
                raw_text: trimmed.to_string(),
                arguments: trimmed.to_string(),
            }
        }
    }

    /// Extract prefix and rest of the message
    fn extract_prefix(text: &str) -> Option<(&str, &str)> {
        if !(text.starts_with('\\') || text.starts_with('/')) {
            return None;
        }
        match text.find(char::is_whitespace) {
            Some(space_pos) => Some((&text[..space_pos], &text[space_pos..])),
            None => Some((text, "")),
        }
    }

    /// Whitespace-separated arguments
    pub fn args(&self) -> Vec<&str> {
        self.arguments.split_whitespace().collect()
    }

    /// First argument as a 1-based record number
    pub fn record_number(&self) -> Option<usize> {
        self.args().first()?.parse().ok().filter(|&n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_command() {
        let cmd = ParsedCommand::parse("/search 渡江");
        assert_eq!(cmd.command_type, CommandType::Search);
        assert_eq!(cmd.arguments, "渡江");

        let cmd = ParsedCommand::parse("\\s");
        assert_eq!(cmd.command_type, CommandType::Search);
        assert_eq!(cmd.arguments, "");
    }

    #[test]
    fn test_plain_text_is_keyword() {
        let cmd = ParsedCommand::parse("  風甚 ");
        assert_eq!(cmd.command_type, CommandType::Keyword);
        assert_eq!(cmd.arguments, "風甚");
    }

    #[test]
    fn test_preset_arguments() {
        let cmd = ParsedCommand::parse("/p 교유 5");
        assert_eq!(cmd.command_type, CommandType::Preset);
        assert_eq!(cmd.args(), vec!["교유", "5"]);
    }

    #[test]
    fn test_record_number() {
        assert_eq!(ParsedCommand::parse("/export 3").record_number(), Some(3));
        assert_eq!(ParsedCommand::parse("/link 0").record_number(), None);
        assert_eq!(ParsedCommand::parse("/link x").record_number(), None);
        assert_eq!(ParsedCommand::parse("/link").record_number(), None);
    }

    #[test]
    fn test_unknown_command() {
        let cmd = ParsedCommand::parse("/frobnicate now");
        assert_eq!(cmd.command_type, CommandType::Unknown);
        assert_eq!(cmd.command_type.as_str(), "unknown");
    }
}
