use term_core::HistoryStore;
use unicode_segmentation::UnicodeSegmentation;

use super::App;

impl<S: HistoryStore> App<S> {
    // Recalled entries put the cursor at the end of the line.
    pub fn recall_prev(&mut self) {
        if self.session.history_prev() {
            self.input_cursor = self.session.input().graphemes(true).count();
        }
    }

    pub fn recall_next(&mut self) {
        if self.session.history_next() {
            self.input_cursor = self.session.input().graphemes(true).count();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;
    use term_core::MemoryHistoryStore;

    #[test]
    fn up_and_down_walk_persisted_history() {
        let mut app = test_app_with(MemoryHistoryStore::with_entries(["ls", "pwd"]));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.input(), "pwd");
        assert_eq!(app.input_cursor, 3);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.input(), "ls");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.input(), "ls");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.input(), "pwd");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.input(), "");
        assert_eq!(app.input_cursor, 0);
    }

    #[test]
    fn up_on_empty_history_keeps_typed_text() {
        let mut app = test_app();
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.input(), "draft");
        assert_eq!(app.input_cursor, 5);
    }

    #[test]
    fn local_commands_are_recorded() {
        let mut app = test_app();
        type_str(&mut app, "help");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "help");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.history().entries(), ["help"]);
        assert_eq!(app.session.store().snapshot(), vec!["help"]);
    }
}
