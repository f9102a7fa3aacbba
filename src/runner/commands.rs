//! Host command ids exposed by the runner.

use std::fmt;

/// User-invocable commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Start a run over the whole document (or stop the active one).
    Run,
    /// Start a run over the caret line only.
    RunForLine,
    /// Resolve the awaiting step and move on.
    Next,
    /// Stop the active run.
    Stop,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Run, Command::RunForLine, Command::Next, Command::Stop];

    /// Id the host binds keys and menus to.
    pub fn id(&self) -> &'static str {
        match self {
            Command::Run => "fixRunner.run",
            Command::RunForLine => "fixRunner.lineProblem",
            Command::Next => "fixRunner.next",
            Command::Stop => "fixRunner.stop",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    /// True for commands the host should only enable while the running flag is set.
    pub fn requires_active_run(&self) -> bool {
        matches!(self, Command::Next | Command::Stop)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_id(cmd.id()), Some(cmd));
        }
        assert_eq!(Command::from_id("fixRunner.unknown"), None);
    }

    #[test]
    fn only_next_and_stop_need_a_run() {
        let gated: Vec<_> = Command::ALL
            .into_iter()
            .filter(Command::requires_active_run)
            .collect();
        assert_eq!(gated, vec![Command::Next, Command::Stop]);
    }
}
