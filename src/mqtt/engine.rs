//! Boundary to the MQTT engine supplied by the host platform.

use super::{Config, MessageId, QoS};

/// An MQTT client engine.
///
/// Implemented by the host for whatever client its network stack provides.
/// The engine is responsible for the connection handshake, TLS, packet
/// framing, QoS acknowledgement and reconnection. Its notifications are fed
/// back to [`Client::handle_event`](super::Client::handle_event).
pub trait Engine {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Start the engine; it connects in the background and reports
    /// [`Event::Connected`](super::Event::Connected) once the broker accepts
    /// the session.
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Publish `payload` on `topic`.
    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<MessageId, Self::Error>;

    /// Send a subscribe request for `topic`.
    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<MessageId, Self::Error>;

    /// Send an unsubscribe request for `topic`.
    fn unsubscribe(&mut self, topic: &str) -> Result<MessageId, Self::Error>;
}

/// Creates an engine from endpoint and credential settings.
pub trait Init {
    /// Associated engine type
    type Engine: Engine;

    /// Initialize (but do not start) an engine for `config`.
    fn init(
        &mut self,
        config: &Config<'_>,
    ) -> Result<Self::Engine, <Self::Engine as Engine>::Error>;
}
