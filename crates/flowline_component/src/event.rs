//! Channel lifecycle events.
//!
//! Every observer attached to a [`Channel`] receives `&ChannelEvent` and can
//! match on variants for typed access to the payload.
//!
//! # Example
//!
//! ```ignore
//! use flowline_component::event::ChannelEvent;
//!
//! fn handle_event(event: &ChannelEvent<'_>) {
//!     match event {
//!         ChannelEvent::Data { data, channel } => {
//!             println!("{} carried {}", channel.identity(), data);
//!         }
//!         ChannelEvent::Disconnect { channel } => {
//!             println!("{} closed", channel.identity());
//!         }
//!         _ => {}
//!     }
//! }
//! ```

use core::fmt;
use core::str::FromStr;

use serde_json::Value;

use crate::channel::Channel;

// ─────────────────────────────────────────────────────────────────────────────
// EventCategory
// ─────────────────────────────────────────────────────────────────────────────

/// The fixed set of channel lifecycle points an observer can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventCategory {
    /// A packet was sent.
    Data,
    /// The channel was opened.
    Connect,
    /// The channel was closed.
    Disconnect,
    /// A packet group was opened.
    BeginGroup,
    /// A packet group was closed.
    EndGroup,
}

impl EventCategory {
    /// All categories, in declaration order.
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Data,
        EventCategory::Connect,
        EventCategory::Disconnect,
        EventCategory::BeginGroup,
        EventCategory::EndGroup,
    ];

    /// Returns the wire name of the category (`"data"`, `"beginGroup"`, ...).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Data => "data",
            EventCategory::Connect => "connect",
            EventCategory::Disconnect => "disconnect",
            EventCategory::BeginGroup => "beginGroup",
            EventCategory::EndGroup => "endGroup",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string did not name one of the [`EventCategory`] values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event category '{0}': expected one of data, connect, disconnect, beginGroup, endGroup")]
pub struct UnknownCategory(pub String);

impl FromStr for EventCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChannelEvent
// ─────────────────────────────────────────────────────────────────────────────

/// Payload handed to channel observers.
///
/// Each variant carries the channel that fired it, so a single observer can be
/// shared across many channels and still tell them apart.
#[derive(Debug, Clone, Copy)]
pub enum ChannelEvent<'a> {
    /// The channel was opened.
    Connect {
        /// The firing channel.
        channel: &'a Channel,
    },
    /// A packet was sent.
    Data {
        /// The packet.
        data: &'a Value,
        /// The firing channel.
        channel: &'a Channel,
    },
    /// A packet group was opened.
    BeginGroup {
        /// The group name.
        group: &'a str,
        /// The firing channel.
        channel: &'a Channel,
    },
    /// A packet group was closed.
    EndGroup {
        /// The group name.
        group: &'a str,
        /// The firing channel.
        channel: &'a Channel,
    },
    /// The channel was closed.
    Disconnect {
        /// The firing channel.
        channel: &'a Channel,
    },
}

impl<'a> ChannelEvent<'a> {
    /// Returns the category this event is dispatched under.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        match self {
            ChannelEvent::Connect { .. } => EventCategory::Connect,
            ChannelEvent::Data { .. } => EventCategory::Data,
            ChannelEvent::BeginGroup { .. } => EventCategory::BeginGroup,
            ChannelEvent::EndGroup { .. } => EventCategory::EndGroup,
            ChannelEvent::Disconnect { .. } => EventCategory::Disconnect,
        }
    }

    /// Returns the channel that fired this event.
    #[must_use]
    pub fn channel(&self) -> &'a Channel {
        match *self {
            ChannelEvent::Connect { channel }
            | ChannelEvent::Data { channel, .. }
            | ChannelEvent::BeginGroup { channel, .. }
            | ChannelEvent::EndGroup { channel, .. }
            | ChannelEvent::Disconnect { channel } => channel,
        }
    }

    /// Returns the packet for [`Data`](ChannelEvent::Data) events.
    #[must_use]
    pub fn data(&self) -> Option<&'a Value> {
        match *self {
            ChannelEvent::Data { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns the group name for group boundary events.
    #[must_use]
    pub fn group(&self) -> Option<&'a str> {
        match *self {
            ChannelEvent::BeginGroup { group, .. } | ChannelEvent::EndGroup { group, .. } => {
                Some(group)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ChannelEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelEvent::Connect { channel } => write!(f, "Connect({})", channel.identity()),
            ChannelEvent::Data { data, channel } => {
                write!(f, "Data({}, data: {})", channel.identity(), data)
            }
            ChannelEvent::BeginGroup { group, channel } => {
                write!(f, "BeginGroup({}, group: {})", channel.identity(), group)
            }
            ChannelEvent::EndGroup { group, channel } => {
                write!(f, "EndGroup({}, group: {})", channel.identity(), group)
            }
            ChannelEvent::Disconnect { channel } => {
                write!(f, "Disconnect({})", channel.identity())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Endpoint;

    #[test]
    fn category_round_trips_through_wire_names() {
        for category in EventCategory::ALL {
            assert_eq!(category.as_str().parse::<EventCategory>(), Ok(category));
        }
    }

    #[test]
    fn category_names_are_case_sensitive() {
        assert!("begingroup".parse::<EventCategory>().is_err());
        assert!("Data".parse::<EventCategory>().is_err());
    }

    #[test]
    fn unknown_category_names_the_input() {
        let err = "notareal".parse::<EventCategory>().unwrap_err();
        assert_eq!(err, UnknownCategory("notareal".to_string()));
        assert!(err.to_string().contains("notareal"));
    }

    #[test]
    fn event_accessors() {
        let channel = Channel::seed(Endpoint::new("A", "in"));
        let data = Value::from(7);

        let event = ChannelEvent::Data {
            data: &data,
            channel: &channel,
        };
        assert_eq!(event.category(), EventCategory::Data);
        assert_eq!(event.data(), Some(&data));
        assert!(event.group().is_none());
        assert_eq!(event.channel().identity(), "ANON:A.in");

        let event = ChannelEvent::EndGroup {
            group: "batch",
            channel: &channel,
        };
        assert_eq!(event.category(), EventCategory::EndGroup);
        assert_eq!(event.group(), Some("batch"));
        assert_eq!(event.to_string(), "EndGroup(ANON:A.in, group: batch)");
    }
}
