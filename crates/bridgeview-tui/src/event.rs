//! Terminal input plus the animation and frame clocks, polled in place.
//!
//! `next` runs on the app's own task and waits on whichever source fires
//! first. Key releases, repeats and mouse events never leave this module.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::warn;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Animation and toast-expiry tick. Never triggers a reload.
    Tick,
    Render,
}

pub struct EventReader {
    input: EventStream,
    tick: Interval,
    render: Interval,
    input_closed: bool,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        Self {
            input: EventStream::new(),
            tick: clock(tick_rate),
            render: clock(render_rate),
            input_closed: false,
        }
    }

    /// Next event, or `None` once terminal input has ended. Cancel-safe.
    pub async fn next(&mut self) -> Option<Event> {
        loop {
            if self.input_closed {
                return None;
            }
            let event = tokio::select! {
                _ = self.tick.tick() => Event::Tick,
                _ = self.render.tick() => Event::Render,
                input = self.input.next() => match input {
                    Some(Ok(raw)) => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                    Some(Err(err)) => {
                        warn!(error = %err, "terminal input error");
                        continue;
                    }
                    None => {
                        self.input_closed = true;
                        continue;
                    }
                },
            };
            return Some(event);
        }
    }
}

fn clock(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(kind: KeyEventKind) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new_with_kind(KeyCode::Char('r'), KeyModifiers::NONE, kind))
    }

    #[test]
    fn only_key_presses_pass() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(Event::Key(_))));
        assert_eq!(translate(key(KeyEventKind::Release)), None);
        assert_eq!(translate(key(KeyEventKind::Repeat)), None);
    }

    #[test]
    fn resize_and_focus() {
        assert_eq!(translate(CrosstermEvent::Resize(120, 40)), Some(Event::Resize(120, 40)));
        assert_eq!(translate(CrosstermEvent::FocusGained), None);
    }
}
