//! Endpoint and credential settings handed to the engine.
//!
//! A [`Config`] names the broker either by host and port or by URI, the same
//! two ways the host engines accept. It can be built in code or read from a
//! JSON document:
//!
//! ```rust
//! use mqtt_dispatch::mqtt::{Config, Endpoint};
//!
//! let config = Config::from_json(
//!     r#"{"uri": "mqtts://broker.local:8883", "client_id": "sensor-7"}"#,
//! )
//! .unwrap();
//! assert_eq!(config.resolved_client_id(), Some("sensor-7"));
//! assert!(matches!(config.endpoint(), Ok(Endpoint::Uri { .. })));
//! ```

use serde::Deserialize;

/// Port used when a host is given without one.
pub const DEFAULT_PORT: u16 = 1883;
/// Engine receive buffer size used when none is given.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Transport selected by the broker URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `mqtt://`
    Tcp,
    /// `mqtts://`
    Tls,
    /// `ws://`
    Ws,
    /// `wss://`
    Wss,
}

impl Transport {
    /// Map a URI scheme to its transport.
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "mqtt" | "tcp" => Some(Transport::Tcp),
            "mqtts" | "ssl" => Some(Transport::Tls),
            "ws" => Some(Transport::Ws),
            "wss" => Some(Transport::Wss),
            _ => None,
        }
    }

    /// Whether the transport is encrypted.
    pub fn is_secure(&self) -> bool {
        matches!(self, Transport::Tls | Transport::Wss)
    }
}

/// Where the broker lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// Plain host name or address and port.
    Host {
        /// Host name or address.
        host: &'a str,
        /// TCP port.
        port: u16,
    },
    /// Full broker URI such as `mqtts://broker:8883`.
    Uri {
        /// The URI as given.
        uri: &'a str,
        /// Transport selected by its scheme.
        transport: Transport,
    },
}

/// Errors found while reading or validating a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse,
    /// Neither a host nor a URI was given.
    MissingEndpoint,
    /// Both a host and a URI were given.
    ConflictingEndpoint,
    /// The host (or the host part of the URI) is empty.
    EmptyHost,
    /// Port zero.
    InvalidPort,
    /// The URI has no scheme or an unknown one.
    UnsupportedScheme,
    /// Buffer size zero.
    InvalidBufferSize,
}

/// Connection settings for an engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config<'a> {
    /// Broker host; mutually exclusive with `uri`.
    #[serde(borrow, default)]
    pub host: Option<&'a str>,
    /// Broker port, used together with `host`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Broker URI; mutually exclusive with `host`.
    #[serde(borrow, default)]
    pub uri: Option<&'a str>,
    /// Client identifier. Empty or absent means no client id.
    #[serde(borrow, default)]
    pub client_id: Option<&'a str>,
    /// PEM certificate of the broker's CA. Never read from JSON.
    #[serde(skip)]
    pub cert_pem: Option<&'a str>,
    /// Engine receive buffer size in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl<'a> Config<'a> {
    /// Connect to `host:port` as `client_id`.
    pub fn host(host: &'a str, port: u16, client_id: &'a str) -> Self {
        Self {
            host: Some(host),
            port,
            uri: None,
            client_id: Some(client_id),
            cert_pem: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Connect to the broker at `uri` as `client_id`.
    pub fn uri(uri: &'a str, client_id: &'a str) -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            uri: Some(uri),
            client_id: Some(client_id),
            cert_pem: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Verify the broker against `cert_pem`.
    pub fn with_cert(mut self, cert_pem: &'a str) -> Self {
        self.cert_pem = Some(cert_pem);
        self
    }

    /// Use a receive buffer of `buffer_size` bytes.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Parse a JSON document and validate the result.
    pub fn from_json(json: &'a str) -> Result<Self, ConfigError> {
        let (config, _) =
            serde_json_core::from_str::<Config<'a>>(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// The client id to present, or `None` to let the engine connect
    /// without one.
    pub fn resolved_client_id(&self) -> Option<&'a str> {
        self.client_id.filter(|id| !id.is_empty())
    }

    /// Resolve the broker endpoint.
    pub fn endpoint(&self) -> Result<Endpoint<'a>, ConfigError> {
        match (self.host, self.uri) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingEndpoint),
            (None, None) => Err(ConfigError::MissingEndpoint),
            (Some(host), None) => {
                if host.is_empty() {
                    return Err(ConfigError::EmptyHost);
                }
                if self.port == 0 {
                    return Err(ConfigError::InvalidPort);
                }
                Ok(Endpoint::Host {
                    host,
                    port: self.port,
                })
            }
            (None, Some(uri)) => {
                let (scheme, rest) = uri
                    .split_once("://")
                    .ok_or(ConfigError::UnsupportedScheme)?;
                let transport =
                    Transport::from_scheme(scheme).ok_or(ConfigError::UnsupportedScheme)?;
                if rest.is_empty() || rest.starts_with(':') || rest.starts_with('/') {
                    return Err(ConfigError::EmptyHost);
                }
                Ok(Endpoint::Uri { uri, transport })
            }
        }
    }

    /// Transport the engine will use.
    ///
    /// A host endpoint with a certificate is treated as TLS.
    pub fn transport(&self) -> Result<Transport, ConfigError> {
        match self.endpoint()? {
            Endpoint::Uri { transport, .. } => Ok(transport),
            Endpoint::Host { .. } if self.cert_pem.is_some() => Ok(Transport::Tls),
            Endpoint::Host { .. } => Ok(Transport::Tcp),
        }
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;
        if self.buffer_size == 0 {
            return Err(ConfigError::InvalidBufferSize);
        }
        Ok(())
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::Parse => "malformed configuration document",
            ConfigError::MissingEndpoint => "no host or uri given",
            ConfigError::ConflictingEndpoint => "both host and uri given",
            ConfigError::EmptyHost => "empty host",
            ConfigError::InvalidPort => "invalid port",
            ConfigError::UnsupportedScheme => "unsupported uri scheme",
            ConfigError::InvalidBufferSize => "invalid buffer size",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::Parse => defmt::write!(f, "Parse"),
            ConfigError::MissingEndpoint => defmt::write!(f, "MissingEndpoint"),
            ConfigError::ConflictingEndpoint => defmt::write!(f, "ConflictingEndpoint"),
            ConfigError::EmptyHost => defmt::write!(f, "EmptyHost"),
            ConfigError::InvalidPort => defmt::write!(f, "InvalidPort"),
            ConfigError::UnsupportedScheme => defmt::write!(f, "UnsupportedScheme"),
            ConfigError::InvalidBufferSize => defmt::write!(f, "InvalidBufferSize"),
        }
    }
}
