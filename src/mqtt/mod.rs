//! Topic-keyed publish/subscribe over a host-supplied MQTT engine.
//!
//! The engine (the [`Engine`] trait) owns the protocol: connection handshake,
//! TLS, packet framing, QoS acknowledgement and reconnection. This module only
//! keeps track of which callback belongs to which topic.
//!
//! # Flow
//!
//! 1. Register callbacks with [`Client::subscribe`]. This can happen before
//!    the engine is started.
//! 2. Start the engine with [`Client::begin`] (initialize from a [`Config`])
//!    or [`Client::attach`] (already initialized).
//! 3. Forward every engine notification to [`Client::handle_event`]. On
//!    [`Event::Connected`] the client replays all registered subscriptions;
//!    on [`Event::Data`] it calls the callback registered for the topic.
//!
//! Messages on topics nobody subscribed to are logged and dropped.

#![deny(unsafe_code)]

pub mod assembler;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod registry;


pub use assembler::{Assembler, DropReason, Progress};
pub use client::{Client, State};
pub use config::{Config, ConfigError, Endpoint, Transport};
pub use engine::{Engine, Init};
pub use error::Error;
pub use event::{Data, ErrorInfo, ErrorKind, Event};
pub use registry::{Handler, RegistryError, Subscription, SubscriptionRegistry};

/// Maximum length of a topic name, in bytes.
pub const MAX_TOPIC_LEN: usize = 128;
/// Maximum number of topics that can be subscribed at once.
pub const MAX_SUBSCRIPTIONS: usize = 16;
/// Maximum size of a reassembled inbound payload, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 4096;

/// Identifier the engine assigns to an outgoing publish/subscribe request.
pub type MessageId = u32;

/// Quality of Service levels for MQTT messages.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum QoS {
    /// At most once delivery.
    AtMostOnce = 0,
    /// At least once delivery.
    AtLeastOnce = 1,
    /// Exactly once delivery.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            other => Err(other),
        }
    }
}

impl From<QoS> for u8 {
    fn from(qos: QoS) -> Self {
        qos as u8
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QoS {
    fn format(&self, f: defmt::Formatter) {
        match self {
            QoS::AtMostOnce => defmt::write!(f, "AtMostOnce"),
            QoS::AtLeastOnce => defmt::write!(f, "AtLeastOnce"),
            QoS::ExactlyOnce => defmt::write!(f, "ExactlyOnce"),
        }
    }
}

/// An inbound message, as handed to a subscription callback.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Message<'a> {
    /// The topic the message was published on.
    pub topic: &'a str,
    /// The payload, byte for byte as delivered by the engine.
    pub payload: &'a [u8],
}

impl<'a> Message<'a> {
    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.payload).ok()
    }
}
