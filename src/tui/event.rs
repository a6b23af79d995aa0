use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::core::action::Action;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    Up,
    Down,
    Select,
    Back,
    Quit,
    ForceQuit, // Ctrl+C
    Resize,
}

impl TuiEvent {
    /// The core action this event stands for, if any.
    pub fn action(self) -> Option<Action> {
        match self {
            TuiEvent::Up => Some(Action::SelectPrevious),
            TuiEvent::Down => Some(Action::SelectNext),
            TuiEvent::Select => Some(Action::OpenSelected),
            TuiEvent::Back => Some(Action::Back),
            TuiEvent::Quit | TuiEvent::ForceQuit => Some(Action::Quit),
            TuiEvent::Resize => None,
        }
    }
}

/// Waits up to `timeout` for input, then reads everything already queued.
/// Ignored events (key releases, unmapped keys) are skipped without ending
/// the drain.
pub fn poll_events(timeout: Duration) -> Vec<TuiEvent> {
    let mut events = Vec::new();
    let mut wait = timeout;
    while event::poll(wait).unwrap_or(false) {
        match event::read() {
            Ok(raw) => events.extend(map_event(raw)),
            Err(e) => {
                log::warn!("Failed to read terminal event: {e}");
                break;
            }
        }
        wait = Duration::ZERO;
    }
    events
}

fn map_event(raw: Event) -> Option<TuiEvent> {
    match raw {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::Up | KeyCode::Char('k')) => Some(TuiEvent::Up),
                (_, KeyCode::Down | KeyCode::Char('j')) => Some(TuiEvent::Down),
                (_, KeyCode::Enter) => Some(TuiEvent::Select),
                (_, KeyCode::Esc | KeyCode::Backspace) => Some(TuiEvent::Back),
                (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
                _ => None,
            }
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
