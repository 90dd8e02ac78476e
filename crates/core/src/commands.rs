// Pseudo-commands handled without contacting the service.

pub const HELP_TEXT: &str = "Available custom commands:
  cpu         - Show current CPU usage percentage.
  memory      - Show current memory usage percentage.
  help        - Display this list of commands.
  clear       - Clear the terminal screen.

You can also use standard shell commands like ls, pwd, mkdir, etc., and natural language like \"create a folder my_stuff\".";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocalCommand {
    Clear,
    Help,
}

impl LocalCommand {
    /// Matches the whole line, ignoring ASCII case. Arguments are not accepted,
    /// so `clear all` goes to the service like any other command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("clear") {
            Some(LocalCommand::Clear)
        } else if line.eq_ignore_ascii_case("help") {
            Some(LocalCommand::Help)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(LocalCommand::parse("CLEAR"), Some(LocalCommand::Clear));
        assert_eq!(LocalCommand::parse("Help"), Some(LocalCommand::Help));
    }

    #[test]
    fn arguments_are_not_local() {
        assert_eq!(LocalCommand::parse("clear all"), None);
        assert_eq!(LocalCommand::parse("help me"), None);
        assert_eq!(LocalCommand::parse("ls"), None);
    }

    #[test]
    fn help_text_lists_custom_commands() {
        assert!(HELP_TEXT.starts_with("Available custom commands:\n"));
        assert!(HELP_TEXT.contains("  cpu         - Show current CPU usage percentage.\n"));
        assert!(HELP_TEXT.ends_with("\"create a folder my_stuff\"."));
    }
}
