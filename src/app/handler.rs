//! Input handling: maps key/mouse events to raw scroll changes.
//!
//! Every change to the raw position goes through [`AppState`], which posts
//! the scroll notification to the engine.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use super::state::AppState;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let step = state.config.wheel_step_px;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => state.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => state.scroll_by(-step),
        KeyCode::Down | KeyCode::Char('j') => state.scroll_by(step),
        KeyCode::PageUp => state.scroll_by(-state.page_step()),
        KeyCode::PageDown | KeyCode::Char(' ') => state.scroll_by(state.page_step()),
        KeyCode::Home | KeyCode::Char('g') => state.scroll_to(0.0),
        KeyCode::End | KeyCode::Char('G') => state.scroll_to(state.page.max_scroll()),
        KeyCode::Char('r') => {
            if let Err(err) = state.reload() {
                tracing::warn!("reload failed: {err}");
                state.status_message = Some(err.to_string());
            }
        }
        _ => {}
    }
}

/// Process a mouse event.  Only the wheel matters.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    let step = state.config.wheel_step_px;
    match mouse.kind {
        MouseEventKind::ScrollUp => state.scroll_by(-step),
        MouseEventKind::ScrollDown => state.scroll_by(step),
        _ => {}
    }
}
