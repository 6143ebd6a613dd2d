use std::{
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput, RemoteReply},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Merges terminal keys with replies from the remote dispatcher. Replies are
/// drained first so a reply never waits behind a poll timeout.
pub struct CrosstermEventSource {
    replies: Receiver<RemoteReply>,
    replies_open: bool,
}

impl CrosstermEventSource {
    pub fn new(replies: Receiver<RemoteReply>) -> Self {
        Self {
            replies,
            replies_open: true,
        }
    }

    fn next_reply(&mut self) -> Option<RemoteReply> {
        if !self.replies_open {
            return None;
        }

        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::warn!(
                    code = "REMOTE_REPLY_CHANNEL_CLOSED",
                    "remote reply channel closed"
                );
                self.replies_open = false;
                None
            }
        }
    }
}

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if let Some(reply) = self.next_reply() {
            return Ok(Some(AppEvent::Remote(reply)));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(None);
            }

            return Ok(map_key(key).map(AppEvent::InputKey));
        }

        Ok(None)
    }
}

fn map_key(key: KeyEvent) -> Option<KeyInput> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let name = match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Tab => "tab".to_owned(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        _ => return None,
    };

    Some(KeyInput::new(name, ctrl))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::domain::remote::{RequestTicket, TicketCounter};

    fn ticket() -> RequestTicket {
        TicketCounter::default().issue()
    }

    #[test]
    fn maps_named_and_control_keys() {
        let tab = map_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        let ctrl_b = map_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL));
        let f1 = map_key(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE));

        assert_eq!(tab, Some(KeyInput::new("tab", false)));
        assert_eq!(ctrl_b, Some(KeyInput::new("b", true)));
        assert_eq!(f1, None);
    }

    #[test]
    fn queued_reply_is_delivered_before_polling_keys() {
        let (tx, rx) = mpsc::channel();
        let reply = RemoteReply::ConsultationsListed {
            ticket: ticket(),
            result: Ok(Vec::new()),
        };
        tx.send(reply.clone()).expect("send reply");
        let mut source = CrosstermEventSource::new(rx);

        assert_eq!(source.next_reply(), Some(reply));
        assert_eq!(source.next_reply(), None);
    }

    #[test]
    fn closed_reply_channel_is_remembered() {
        let (tx, rx) = mpsc::channel::<RemoteReply>();
        drop(tx);
        let mut source = CrosstermEventSource::new(rx);

        assert_eq!(source.next_reply(), None);
        assert!(!source.replies_open);
    }
}
