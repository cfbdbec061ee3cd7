use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone};

use crate::common::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BubbleBody {
    Text(String),
    Image { url: String },
}

/// One rendered message in the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub direction: Direction,
    pub body: BubbleBody,
    pub time_label: String,
    /// Double check mark; only ever set on sent messages the partner has seen.
    pub seen_mark: bool,
}

impl Bubble {
    pub fn from_message(message: &ChatMessage, local_user: &str) -> Self {
        Self::from_message_in(message, local_user, &Local)
    }

    pub fn from_message_in<Tz>(message: &ChatMessage, local_user: &str, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let direction = if message.sender == local_user {
            Direction::Sent
        } else {
            Direction::Received
        };

        let body = if message.is_image() {
            BubbleBody::Image {
                url: message.content.clone(),
            }
        } else {
            BubbleBody::Text(message.content.clone())
        };

        Self {
            direction,
            body,
            time_label: time_label(message.timestamp, tz),
            seen_mark: direction == Direction::Sent && message.seen,
        }
    }

    pub fn is_received(&self) -> bool {
        self.direction == Direction::Received
    }
}

/// `HH:MM` in `tz` for a Unix timestamp in seconds.
pub fn time_label<Tz>(timestamp: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let secs = timestamp.floor() as i64;
    let nanos = ((timestamp - timestamp.floor()) * 1e9) as u32;
    match DateTime::from_timestamp(secs, nanos) {
        Some(utc) => utc.with_timezone(tz).format("%H:%M").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn message(sender: &str, kind: &str, seen: bool) -> ChatMessage {
        ChatMessage {
            sender: sender.into(),
            recipient: None,
            content: "/static/uploads/1_cat.png".into(),
            kind: kind.into(),
            // 2023-11-14 22:13:20 UTC
            timestamp: 1_700_000_000.0,
            seen,
        }
    }

    #[test]
    fn image_types_render_as_images() {
        for kind in ["jpg", "png", "jpeg", "gif"] {
            let bubble = Bubble::from_message_in(&message("bob", kind, false), "alice", &Utc);
            assert!(matches!(bubble.body, BubbleBody::Image { .. }), "{kind}");
        }

        for kind in ["text", "pdf", "webp", "PNG"] {
            let bubble = Bubble::from_message_in(&message("bob", kind, false), "alice", &Utc);
            assert!(matches!(bubble.body, BubbleBody::Text(_)), "{kind}");
        }
    }

    #[test]
    fn seen_mark_only_on_sent_and_seen() {
        let sent_seen = Bubble::from_message_in(&message("alice", "text", true), "alice", &Utc);
        let sent_unseen = Bubble::from_message_in(&message("alice", "text", false), "alice", &Utc);
        let received_seen = Bubble::from_message_in(&message("bob", "text", true), "alice", &Utc);

        assert_eq!(sent_seen.direction, Direction::Sent);
        assert!(sent_seen.seen_mark);
        assert!(!sent_unseen.seen_mark);
        assert!(received_seen.is_received());
        assert!(!received_seen.seen_mark);
    }

    #[test]
    fn time_label_uses_given_zone() {
        assert_eq!(time_label(1_700_000_000.0, &Utc), "22:13");

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(time_label(1_700_000_000.9, &plus_two), "00:13");
    }
}
