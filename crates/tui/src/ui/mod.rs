use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use term_core::{HistoryStore, LineKind};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::strings::{build_status_line, build_stick_label, INPUT_HINT, TITLE_INPUT, TITLE_OUTPUT};
use crate::theme::THEME;

pub fn draw<S: HistoryStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    app.output_area = Some(chunks[0]);
    draw_output(f, chunks[0], app);
    draw_status(f, chunks[1], app);
    draw_input(f, chunks[2], app);
}

fn kind_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Command => Style::default().fg(THEME.command),
        LineKind::Output => Style::default().fg(THEME.output),
        LineKind::Error => Style::default().fg(THEME.error),
    }
}

fn draw_output<S: HistoryStore>(f: &mut Frame, area: Rect, app: &mut App<S>) {
    let block = Block::default()
        .title(TITLE_OUTPUT)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.border));

    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    app.ensure_output_wrapped(inner_width);
    let (viewport, start) = app.compute_output_layout(inner_height);
    app.output_viewport = viewport as u16;

    let prompt_style = Style::default()
        .fg(THEME.prompt)
        .add_modifier(Modifier::BOLD);
    let mut vis_lines: Vec<Line> = Vec::with_capacity(viewport);
    let mut skip = start;
    'outer: for cached in &app.output_cache {
        if skip >= cached.rows.len() {
            skip -= cached.rows.len();
            continue;
        }
        let style = kind_style(cached.kind);
        for (i, row) in cached.rows.iter().enumerate().skip(skip) {
            if vis_lines.len() >= viewport {
                break 'outer;
            }
            let cut = cached.prompt_cuts.get(i).copied().unwrap_or(0);
            if cut > 0 && row.is_char_boundary(cut) {
                vis_lines.push(Line::from(vec![
                    Span::styled(row[..cut].to_string(), prompt_style),
                    Span::styled(row[cut..].to_string(), style),
                ]));
            } else {
                vis_lines.push(Line::from(Span::styled(row.clone(), style)));
            }
        }
        skip = 0;
    }

    f.render_widget(Paragraph::new(vis_lines).block(block), area);

    let inner = Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: inner_width,
        height: inner_height,
    };
    if app.output_total_lines > viewport {
        let mut sb_state = ScrollbarState::new(app.output_total_lines.saturating_sub(viewport))
            .position(start);
        let sb = Scrollbar::default().orientation(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(sb, inner, &mut sb_state);
    }
}

fn draw_status<S: HistoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let stick = build_stick_label(app.output_scroll);
    let text = build_status_line(
        app.endpoint(),
        &stick,
        app.session.history().len(),
        app.in_flight,
        app.notice.as_deref(),
        area.width,
    );
    let para = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(THEME.hint))));
    f.render_widget(para, area);
}

fn draw_input<S: HistoryStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .title(TITLE_INPUT)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(THEME.input_border));
    let inner_width = area.width.saturating_sub(2);

    let input = app.session.input();
    let before_cursor: String = input.graphemes(true).take(app.input_cursor).collect();
    let cursor_col = UnicodeWidthStr::width(before_cursor.as_str()) as u16;
    // Scroll horizontally so the cursor stays inside the box.
    let offset_x = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let para = if input.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            INPUT_HINT,
            Style::default().fg(THEME.hint),
        )))
        .block(block)
    } else {
        Paragraph::new(input.to_string())
            .block(block)
            .scroll((0, offset_x))
    };
    f.render_widget(para, area);

    let cursor_x = area.x + 1 + cursor_col - offset_x;
    f.set_cursor_position(Position::new(cursor_x, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::*;
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &mut App<term_core::MemoryHistoryStore>, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..h {
            for x in 0..w {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_echo_and_help() {
        let mut app = test_app();
        type_str(&mut app, "help");
        press(&mut app, KeyCode::Enter);
        let screen = render(&mut app, 140, 16);
        assert!(screen.contains("guest@codemate:~$ help"));
        assert!(screen.contains("Available custom commands:"));
        assert!(screen.contains(INPUT_HINT));
    }

    #[test]
    fn markup_is_drawn_literally() {
        let mut app = test_app();
        type_str(&mut app, "<b>x</b>");
        let screen = render(&mut app, 60, 8);
        assert!(screen.contains("<b>x</b>"));
    }

    #[test]
    fn wrapped_prompt_keeps_its_style_on_every_row() {
        let mut app = test_app();
        type_str(&mut app, "ls");
        press(&mut app, KeyCode::Enter);
        // Inner width 10 splits the prompt over the first two rows.
        let mut terminal = Terminal::new(TestBackend::new(12, 12)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let buf = terminal.backend().buffer();
        assert_eq!(buf[(1, 1)].style().fg, Some(THEME.prompt));
        assert_eq!(buf[(1, 2)].style().fg, Some(THEME.prompt));
    }

    #[test]
    fn small_viewport_shows_newest_rows() {
        let mut app = test_app();
        type_str(&mut app, "help");
        press(&mut app, KeyCode::Enter);
        let screen = render(&mut app, 140, 7);
        assert!(screen.contains("create a folder my_stuff"));
        assert!(!screen.contains("guest@codemate:~$ help"));
    }
}
