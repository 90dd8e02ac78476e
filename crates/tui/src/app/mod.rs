use std::sync::{mpsc, Arc};

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use providers::{BackendConfig, HttpExecutor};
use ratatui::layout::Rect;
use term_core::commands::LocalCommand;
use term_core::{CommandExecutor as _, Dispatch, ExecError, ExecOutcome, HistoryStore, TerminalSession};
use tracing::{debug, error, info, warn};

use crate::persist::FileHistoryStore;

pub mod history;
pub mod input;
pub mod output;

pub use output::WrappedLine;

/// A finished remote request, delivered back to the UI thread.
struct Completion {
    id: u64,
    result: Result<ExecOutcome, ExecError>,
}

pub struct App<S: HistoryStore = FileHistoryStore> {
    pub session: TerminalSession<S>,
    pub input_cursor: usize,
    executor: Arc<HttpExecutor>,
    runtime: tokio::runtime::Runtime,
    done_tx: mpsc::Sender<Completion>,
    done_rx: mpsc::Receiver<Completion>,
    next_request_id: u64,
    pub in_flight: usize,
    pub should_quit: bool,
    pub dirty: bool,
    pub notice: Option<String>,
    // Output pane
    pub output_area: Option<Rect>,
    pub output_scroll: u16,
    pub stick_to_bottom: bool,
    pub output_viewport: u16,
    pub output_wrap_width: u16,
    pub output_cache: Vec<WrappedLine>,
    pub output_total_lines: usize,
}

impl App<FileHistoryStore> {
    pub fn new() -> anyhow::Result<Self> {
        let cfg = BackendConfig::from_env_and_file();
        info!(target: "tui", "backend endpoint={}", cfg.endpoint);
        let executor = HttpExecutor::new(cfg).context("build http client")?;
        let store = FileHistoryStore::new();
        match store.path() {
            Some(p) => info!(target: "tui", "history file={}", p.display()),
            None => warn!(target: "tui", "no data directory; history will not persist"),
        }
        Self::with_parts(store, executor)
    }
}

impl<S: HistoryStore> App<S> {
    pub fn with_parts(store: S, executor: HttpExecutor) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("codemate-net")
            .enable_all()
            .build()
            .context("start async runtime")?;
        let (done_tx, done_rx) = mpsc::channel();
        Ok(Self {
            session: TerminalSession::new(store),
            input_cursor: 0,
            executor: Arc::new(executor),
            runtime,
            done_tx,
            done_rx,
            next_request_id: 1,
            in_flight: 0,
            should_quit: false,
            dirty: true,
            notice: None,
            output_area: None,
            output_scroll: 0,
            stick_to_bottom: true,
            output_viewport: 0,
            output_wrap_width: 0,
            output_cache: Vec::new(),
            output_total_lines: 0,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.executor.endpoint()
    }

    pub fn submit(&mut self) {
        let Some(dispatch) = self.session.begin_submit() else {
            return;
        };
        self.notice = None;
        match dispatch {
            Dispatch::Local(cmd) => {
                info!(target: "tui", "submit: local {:?}", cmd);
                if cmd == LocalCommand::Clear {
                    self.invalidate_output();
                }
                self.after_submit();
            }
            Dispatch::Remote(line) => self.dispatch_remote(line),
        }
    }

    // Requests are not serialized: several may be in flight, and each is
    // rendered when it completes.
    fn dispatch_remote(&mut self, line: String) {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight += 1;
        info!(target: "tui", "submit: remote id={} input_len={} in_flight={}", id, line.len(), self.in_flight);
        let executor = Arc::clone(&self.executor);
        let tx = self.done_tx.clone();
        self.runtime.spawn(async move {
            let result = executor.execute(&line).await;
            if tx.send(Completion { id, result }).is_err() {
                debug!(target: "tui", "completion id={} dropped, ui gone", id);
            }
        });
    }

    fn after_submit(&mut self) {
        self.input_cursor = 0;
        self.scroll_to_bottom();
        self.dirty = true;
    }

    pub fn save_transcript(&mut self) {
        match crate::persist::save_transcript(self.session.log()) {
            Ok(path) => {
                info!(target: "tui", "transcript saved to {}", path.display());
                self.notice = Some(format!("Saved transcript to {}", path.display()));
            }
            Err(e) => {
                error!(target: "tui", "transcript save failed: {:#}", e);
                self.notice = Some("Could not save transcript (see log)".to_string());
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.save_transcript(),
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.kill_to_start(),
            KeyCode::Char('k') if ctrl => self.kill_to_end(),
            KeyCode::Char('a') if ctrl => self.move_cursor_start(),
            KeyCode::Char('e') if ctrl => self.move_cursor_end(),
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf));
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Up if ctrl => self.scroll_up(1),
            KeyCode::Down if ctrl => self.scroll_down(1),
            KeyCode::Up => self.recall_prev(),
            KeyCode::Down => self.recall_next(),
            KeyCode::Left if ctrl => self.move_cursor_word_left(),
            KeyCode::Right if ctrl => self.move_cursor_word_right(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home if ctrl => self.scroll_to_top(),
            KeyCode::End if ctrl => self.scroll_to_bottom(),
            KeyCode::Home => self.move_cursor_start(),
            KeyCode::End => self.move_cursor_end(),
            KeyCode::Backspace => self.delete_left_grapheme(),
            KeyCode::Delete => self.delete_right_grapheme(),
            KeyCode::PageUp => self.scroll_up(self.output_viewport.max(1)),
            KeyCode::PageDown => self.scroll_down(self.output_viewport.max(1)),
            _ => return,
        }
        self.dirty = true;
    }

    /// Applies completed requests in arrival order.
    pub fn on_tick(&mut self) {
        while let Ok(done) = self.done_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            debug!(target: "tui", "completion id={} ok={}", done.id, done.result.is_ok());
            self.session.finish_remote(done.result);
            self.after_submit();
        }
    }
}
