//! UI actions. Anything that changes dashboard data travels as
//! `Action::Core` and is handed to the session untouched.

use bridgeview_core::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,
    /// Acknowledge the blocking notice.
    DismissNotice,
    Core(Command),
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        Self::Core(command)
    }
}
