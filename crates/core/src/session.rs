use tracing::{debug, error, warn};

use crate::commands::{LocalCommand, HELP_TEXT};
use crate::exec::{CommandExecutor, ExecError, ExecOutcome, CONNECTION_ERROR_MESSAGE};
use crate::history::{CommandHistory, HistoryStore, Recall};
use crate::output::{OutputLine, OutputLog};

/// What a submitted line turned into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Handled in place; the input buffer is already cleared.
    Local(LocalCommand),
    /// Must be sent to the service, then passed to [`TerminalSession::finish_remote`].
    Remote(String),
}

/// Input buffer, command history and output log of one terminal.
pub struct TerminalSession<S: HistoryStore> {
    store: S,
    history: CommandHistory,
    log: OutputLog,
    input: String,
}

impl<S: HistoryStore> TerminalSession<S> {
    pub fn new(store: S) -> Self {
        let history = CommandHistory::load_from(&store);
        debug!(target: "core::session", "loaded {} history entries", history.len());
        Self {
            store,
            history,
            log: OutputLog::new(),
            input: String::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input<T: Into<String>>(&mut self, text: T) {
        self.input = text.into();
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn log(&self) -> &OutputLog {
        &self.log
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Echoes and records the current input, then handles pseudo-commands.
    ///
    /// Returns `None` when the trimmed input is empty; nothing changes in
    /// that case, not even the input buffer.
    pub fn begin_submit(&mut self) -> Option<Dispatch> {
        let line = self.input.trim().to_string();
        if line.is_empty() {
            return None;
        }

        self.log.push(OutputLine::command(line.clone()));
        if self.history.record(&line) {
            if let Err(e) = self.store.save(self.history.entries()) {
                warn!(target: "core::session", "history save failed: {}", e);
            }
        }

        match LocalCommand::parse(&line) {
            Some(LocalCommand::Clear) => {
                self.log.clear();
                self.input.clear();
                Some(Dispatch::Local(LocalCommand::Clear))
            }
            Some(LocalCommand::Help) => {
                self.log.push(OutputLine::output(HELP_TEXT));
                self.input.clear();
                Some(Dispatch::Local(LocalCommand::Help))
            }
            None => Some(Dispatch::Remote(line)),
        }
    }

    /// Renders the result of a remote request and clears the input buffer.
    pub fn finish_remote(&mut self, result: Result<ExecOutcome, ExecError>) {
        let line = match result {
            Ok(ExecOutcome::Output(text)) => OutputLine::output(text),
            Ok(ExecOutcome::Error(text)) => OutputLine::error(text),
            Err(e) => {
                error!(target: "core::session", "execute failed: {}", e);
                OutputLine::error(CONNECTION_ERROR_MESSAGE)
            }
        };
        self.log.push(line);
        self.input.clear();
    }

    /// Full submit flow, suspending on the remote call when there is one.
    pub async fn submit<E: CommandExecutor>(&mut self, executor: &E) -> Option<Dispatch> {
        let dispatch = self.begin_submit()?;
        if let Dispatch::Remote(line) = &dispatch {
            let result = executor.execute(line).await;
            self.finish_remote(result);
        }
        Some(dispatch)
    }

    /// Returns whether the input buffer changed.
    pub fn history_prev(&mut self) -> bool {
        let r = self.history.prev();
        self.apply_recall(r)
    }

    pub fn history_next(&mut self) -> bool {
        let r = self.history.next();
        self.apply_recall(r)
    }

    fn apply_recall(&mut self, recall: Recall) -> bool {
        match recall {
            Recall::Entry(text) => {
                self.input = text;
                true
            }
            Recall::Blank => {
                self.input.clear();
                true
            }
            Recall::Unchanged => false,
        }
    }
}
