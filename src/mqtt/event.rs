//! Notifications an engine reports to the client.

use super::MessageId;

/// An engine notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// The engine is about to open a connection.
    BeforeConnect,
    /// The broker accepted the session.
    Connected,
    /// The connection was lost or closed.
    Disconnected,
    /// The broker acknowledged a subscribe request.
    Subscribed(MessageId),
    /// The broker acknowledged an unsubscribe request.
    Unsubscribed(MessageId),
    /// The broker acknowledged a publish.
    Published(MessageId),
    /// Inbound message data.
    Data(Data<'a>),
    /// The engine hit a transport or protocol error.
    Error(ErrorInfo),
    /// Any other engine-specific notification, by raw id.
    Other(i32),
}

/// A chunk of an inbound message.
///
/// Engines with a fixed receive buffer split large payloads over several data
/// events. The first chunk has `offset == 0` and carries the topic; later
/// chunks may leave `topic` empty. `total_len` is the size of the whole
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Data<'a> {
    /// The topic of the message.
    pub topic: &'a str,
    /// The bytes carried by this chunk.
    pub payload: &'a [u8],
    /// Position of this chunk within the whole payload.
    pub offset: usize,
    /// Size of the whole payload.
    pub total_len: usize,
}

impl<'a> Data<'a> {
    /// A message delivered in a single chunk.
    pub fn complete(topic: &'a str, payload: &'a [u8]) -> Self {
        Self {
            topic,
            payload,
            offset: 0,
            total_len: payload.len(),
        }
    }

    /// Whether this chunk holds the entire payload.
    pub fn is_complete(&self) -> bool {
        self.offset == 0 && self.payload.len() == self.total_len
    }
}

/// Category of an engine error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Socket or TLS failure below MQTT.
    TcpTransport,
    /// The broker refused the connection; see
    /// [`ErrorInfo::connect_return_code`].
    ConnectionRefused,
    /// Anything else.
    Unknown,
}

/// Details of an engine error. Zero means "not set" for every code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Category of the error.
    pub kind: ErrorKind,
    /// Last error reported by the TLS layer.
    pub tls_last_error: i32,
    /// Error reported by the underlying TLS stack.
    pub tls_stack_error: i32,
    /// Socket errno captured by the transport.
    pub socket_errno: i32,
    /// CONNACK return code when the broker refused the connection.
    pub connect_return_code: u8,
}

impl ErrorInfo {
    /// An error of `kind` with no codes attached.
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            tls_last_error: 0,
            tls_stack_error: 0,
            socket_errno: 0,
            connect_return_code: 0,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ErrorKind::TcpTransport => defmt::write!(f, "TcpTransport"),
            ErrorKind::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            ErrorKind::Unknown => defmt::write!(f, "Unknown"),
        }
    }
}
