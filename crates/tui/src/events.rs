use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseEventKind};
use ratatui::{backend::Backend, Terminal};
use term_core::HistoryStore;
use tracing::info;

use crate::{app::App, ui};

const MOUSE_SCROLL_ROWS: u16 = 3;

pub fn run<B: Backend, S: HistoryStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.on_key(key),
                Event::Paste(s) => {
                    app.insert_text(&s);
                    app.dirty = true;
                }
                Event::Resize(_, _) => app.dirty = true,
                Event::Mouse(me) => {
                    let inside = app.output_area.is_some_and(|area| {
                        me.column >= area.x
                            && me.column < area.x + area.width
                            && me.row >= area.y
                            && me.row < area.y + area.height
                    });
                    if inside {
                        match me.kind {
                            MouseEventKind::ScrollUp => {
                                app.scroll_up(MOUSE_SCROLL_ROWS);
                                app.dirty = true;
                            }
                            MouseEventKind::ScrollDown => {
                                app.scroll_down(MOUSE_SCROLL_ROWS);
                                app.dirty = true;
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }

        let before = app.in_flight;
        app.on_tick();
        if app.in_flight != before {
            app.dirty = true;
        }

        if app.should_quit {
            if app.in_flight > 0 {
                info!(target: "tui", "quitting with {} request(s) in flight", app.in_flight);
            }
            break;
        }
    }
    Ok(())
}
