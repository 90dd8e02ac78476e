pub mod commands;
pub mod exec;
pub mod history;
pub mod output;
pub mod session;

pub use exec::{CommandExecutor, ExecError, ExecOutcome};
pub use history::{CommandHistory, HistoryStore, MemoryHistoryStore, StoreError};
pub use output::{LineKind, OutputLine, OutputLog};
pub use session::{Dispatch, TerminalSession};
