use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::tui_app::App;

/// Poll for and handle events. Returns true if an event was processed.
pub fn handle_events(app: &mut App) -> std::io::Result<bool> {
    if event::poll(Duration::from_millis(100))?
        && let Event::Key(key) = event::read()?
    {
        // Only handle Press events (ignore Release on some platforms)
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        if app.wizard.is_complete() {
            handle_results(app, key);
        } else {
            handle_question(app, key);
        }
        return Ok(true);
    }
    Ok(false)
}

fn handle_question(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),

        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.select(),
        KeyCode::Char(c @ '1'..='9') => app.select_number(c as usize - '0' as usize),

        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('b') => {
            app.back()
        }

        _ => {}
    }
}

fn handle_results(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),

        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('b') => {
            app.back()
        }

        // Start over
        KeyCode::Char('r') => app.reset(),

        KeyCode::Char('s') => app.save_results(),

        _ => {}
    }
}
