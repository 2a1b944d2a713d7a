//! # mqtt-dispatch
//!
//! A small adapter that puts a topic-keyed publish/subscribe surface on top of
//! an MQTT client engine supplied by the host platform (the vendor network
//! stack, an RTOS component, a desktop client library, ...). The engine keeps
//! ownership of everything protocol-related: the connection handshake, TLS,
//! packet framing, QoS acknowledgement and reconnection.
//!
//! What this crate adds on top:
//!
//! - a registry mapping each subscribed topic to its QoS level and callback
//! - replay of every registered subscription whenever the engine reports a
//!   new connection
//! - dispatch of inbound messages to the callback registered for their topic
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mqtt_dispatch::mqtt::{Client, Config, Engine, Event, Message, MessageId, QoS};
//!
//! # struct HostEngine;
//! # impl Engine for HostEngine {
//! #     type Error = ();
//! #     fn start(&mut self) -> Result<(), ()> { Ok(()) }
//! #     fn publish(&mut self, _: &str, _: &[u8], _: QoS, _: bool) -> Result<MessageId, ()> { Ok(0) }
//! #     fn subscribe(&mut self, _: &str, _: QoS) -> Result<MessageId, ()> { Ok(0) }
//! #     fn unsubscribe(&mut self, _: &str) -> Result<MessageId, ()> { Ok(0) }
//! # }
//! fn on_led(message: &Message<'_>) {
//!     let _on = message.payload == b"1";
//! }
//!
//! let mut client: Client<HostEngine, fn(&Message<'_>)> = Client::new();
//! client.subscribe("device/led", QoS::AtLeastOnce, on_led).unwrap();
//! client.attach(HostEngine).unwrap();
//!
//! // The host forwards every engine notification to the client.
//! client.handle_event(Event::Connected);
//! client.publish("device/status", b"online", QoS::AtMostOnce, true).unwrap();
//! ```
//!
//! ## Optional Features
//!
//! - `std`: Enable standard library support (`std::error::Error` impls)
//! - `defmt`: Log through `defmt` and derive `defmt::Format` for error types
//! - `log`: Log through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("features `defmt` and `log` are mutually exclusive");

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

/// Topic-keyed MQTT adapter.
///
/// Contains the [`Client`](mqtt::Client) adapter, the [`Engine`](mqtt::Engine)
/// boundary the host implements, the subscription registry and the
/// configuration types.
pub mod mqtt;
