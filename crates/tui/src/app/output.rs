use term_core::output::PROMPT;
use term_core::{HistoryStore, LineKind, OutputLine};
use textwrap::{wrap, Options};

use super::App;

/// An output line broken into display rows for the current pane width.
#[derive(Clone, Debug)]
pub struct WrappedLine {
    pub kind: LineKind,
    /// Byte length of the prompt at the start of each row. The prompt may
    /// itself wrap on narrow panes, so more than one row can carry part of it.
    pub prompt_cuts: Vec<usize>,
    pub rows: Vec<String>,
}

pub fn wrap_output_line(line: &OutputLine, width: u16) -> WrappedLine {
    let width = width.max(1) as usize;
    let (text, prompt) = match line.kind {
        LineKind::Command => (format!("{} {}", PROMPT, line.text), PROMPT),
        LineKind::Output | LineKind::Error => (line.text.clone(), ""),
    };
    let mut rows = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.trim_end_matches('\r').replace('\t', "    ");
        if raw.is_empty() {
            rows.push(String::new());
            continue;
        }
        let opts = Options::new(width).break_words(true);
        rows.extend(wrap(&raw, opts).into_iter().map(|c| c.into_owned()));
    }
    WrappedLine {
        kind: line.kind,
        prompt_cuts: prompt_cuts(&rows, prompt),
        rows,
    }
}

fn prompt_cuts(rows: &[String], prompt: &str) -> Vec<usize> {
    let mut left = prompt;
    rows.iter()
        .map(|row| {
            let cut = row
                .char_indices()
                .zip(left.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map_or(0, |((i, c), _)| i + c.len_utf8());
            left = &left[cut..];
            cut
        })
        .collect()
}

impl<S: HistoryStore> App<S> {
    pub fn invalidate_output(&mut self) {
        self.output_cache.clear();
        self.output_wrap_width = 0;
        self.output_total_lines = 0;
        self.output_scroll = 0;
    }

    /// Wraps any log lines not yet in the cache; rewraps everything when the
    /// width changed or the log shrank.
    pub fn ensure_output_wrapped(&mut self, width: u16) {
        let width = width.max(1);
        let lines = self.session.log().lines();
        if self.output_wrap_width != width || self.output_cache.len() > lines.len() {
            self.output_cache.clear();
            self.output_wrap_width = width;
        }
        for line in &lines[self.output_cache.len()..] {
            self.output_cache.push(wrap_output_line(line, width));
        }
        self.output_total_lines = self.output_cache.iter().map(|w| w.rows.len()).sum();
    }

    /// Returns `(viewport, first_visible_row)` and clamps the scroll offset.
    pub fn compute_output_layout(&mut self, inner_height: u16) -> (usize, usize) {
        let viewport = inner_height as usize;
        let max_scroll = self.output_total_lines.saturating_sub(viewport);
        if self.stick_to_bottom {
            self.output_scroll = 0;
        }
        let scroll = (self.output_scroll as usize).min(max_scroll);
        self.output_scroll = scroll.min(u16::MAX as usize) as u16;
        (viewport, max_scroll - scroll)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.output_scroll = self.output_scroll.saturating_add(rows);
        self.stick_to_bottom = false;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.output_scroll = self.output_scroll.saturating_sub(rows);
        if self.output_scroll == 0 {
            self.stick_to_bottom = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.output_scroll = u16::MAX;
        self.stick_to_bottom = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.output_scroll = 0;
        self.stick_to_bottom = true;
    }
}
