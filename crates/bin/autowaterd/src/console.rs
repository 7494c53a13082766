//! Interactive console commands read from stdin.

/// Shown after every status block.
pub const PROMPT: &str = "Type Stop to pause the bus connection.\n\
                          Type Start to resume it.\n\
                          Type anything else to print the system state.";

/// A single console line, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Disconnect from the broker.
    Stop,
    /// Reconnect and republish the current state.
    Start,
    /// Print the status block.
    Status,
}

impl ConsoleCommand {
    /// Commands are matched exactly, ignoring the trailing line break.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            "Stop" => Self::Stop,
            "Start" => Self::Start,
            _ => Self::Status,
        }
    }
}
