//! Errors surfaced by the client.

use super::{ConfigError, RegistryError};

/// Errors returned by [`Client`](super::Client) operations.
///
/// `E` is the engine's error type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error<E> {
    /// The engine rejected the request.
    Engine(E),
    /// No engine has been started yet.
    NotStarted,
    /// An engine is already running.
    AlreadyStarted,
    /// The topic is longer than [`MAX_TOPIC_LEN`](super::MAX_TOPIC_LEN).
    TopicTooLong,
    /// The topic is empty.
    EmptyTopic,
    /// No room for another subscription.
    RegistryFull,
    /// The configuration is invalid.
    Config(ConfigError),
}

impl<E> From<RegistryError> for Error<E> {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::TopicTooLong => Error::TopicTooLong,
            RegistryError::EmptyTopic => Error::EmptyTopic,
            RegistryError::RegistryFull => Error::RegistryFull,
        }
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Engine(err) => write!(f, "engine error: {:?}", err),
            Error::NotStarted => f.write_str("engine not started"),
            Error::AlreadyStarted => f.write_str("engine already started"),
            Error::TopicTooLong => f.write_str("topic too long"),
            Error::EmptyTopic => f.write_str("empty topic"),
            Error::RegistryFull => f.write_str("subscription registry full"),
            Error::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for Error<E> {}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Engine(_) => defmt::write!(f, "Engine"),
            Error::NotStarted => defmt::write!(f, "NotStarted"),
            Error::AlreadyStarted => defmt::write!(f, "AlreadyStarted"),
            Error::TopicTooLong => defmt::write!(f, "TopicTooLong"),
            Error::EmptyTopic => defmt::write!(f, "EmptyTopic"),
            Error::RegistryFull => defmt::write!(f, "RegistryFull"),
            Error::Config(err) => defmt::write!(f, "Config({})", err),
        }
    }
}
