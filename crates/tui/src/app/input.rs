use term_core::HistoryStore;
use unicode_segmentation::UnicodeSegmentation;

use super::App;

fn is_blank(g: &str) -> bool {
    g.trim().is_empty()
}

impl<S: HistoryStore> App<S> {
    fn input_len(&self) -> usize {
        self.session.input().graphemes(true).count()
    }

    /// Replaces graphemes `start..end` of the input with `with` and leaves the
    /// cursor right after the inserted text.
    fn splice_input(&mut self, start: usize, end: usize, with: &str) {
        let parts: Vec<&str> = self.session.input().graphemes(true).collect();
        let end = end.min(parts.len());
        let start = start.min(end);
        let mut next = String::with_capacity(self.session.input().len() + with.len());
        next.push_str(&parts[..start].concat());
        next.push_str(with);
        next.push_str(&parts[end..].concat());
        let cursor = start + with.graphemes(true).count();
        self.session.set_input(next);
        self.input_cursor = cursor.min(self.input_len());
    }

    /// Inserts at the cursor. The command line is a single line, so line
    /// breaks (e.g. from a paste) become spaces.
    pub fn insert_text(&mut self, s: &str) {
        let flat = s.replace("\r\n", " ").replace(['\n', '\r'], " ");
        let at = self.input_cursor;
        self.splice_input(at, at, &flat);
    }

    pub fn delete_left_grapheme(&mut self) {
        let at = self.input_cursor.min(self.input_len());
        if at > 0 {
            self.splice_input(at - 1, at, "");
        }
    }

    pub fn delete_right_grapheme(&mut self) {
        let at = self.input_cursor.min(self.input_len());
        if at < self.input_len() {
            self.splice_input(at, at + 1, "");
        }
    }

    pub fn delete_prev_word(&mut self) {
        let end = self.input_cursor.min(self.input_len());
        let start = self.word_start_before(end);
        self.splice_input(start, end, "");
    }

    pub fn kill_to_start(&mut self) {
        let end = self.input_cursor;
        self.splice_input(0, end, "");
    }

    pub fn kill_to_end(&mut self) {
        let start = self.input_cursor;
        let end = self.input_len();
        self.splice_input(start, end, "");
        self.input_cursor = start.min(self.input_len());
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.min(self.input_len()).saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.input_cursor = (self.input_cursor + 1).min(self.input_len());
    }

    pub fn move_cursor_start(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input_len();
    }

    pub fn move_cursor_word_left(&mut self) {
        let at = self.input_cursor.min(self.input_len());
        self.input_cursor = self.word_start_before(at);
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts: Vec<&str> = self.session.input().graphemes(true).collect();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && is_blank(parts[i]) {
            i += 1;
        }
        while i < parts.len() && !is_blank(parts[i]) {
            i += 1;
        }
        self.input_cursor = i;
    }

    fn word_start_before(&self, at: usize) -> usize {
        let parts: Vec<&str> = self.session.input().graphemes(true).collect();
        let mut i = at.min(parts.len());
        while i > 0 && is_blank(parts[i - 1]) {
            i -= 1;
        }
        while i > 0 && !is_blank(parts[i - 1]) {
            i -= 1;
        }
        i
    }
}
