//! Reassembly of inbound payloads split over several data events.

use super::{Data, MAX_PAYLOAD_LEN, MAX_TOPIC_LEN, Message};
use heapless::{String, Vec};

/// Outcome of feeding one chunk to the [`Assembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More chunks are expected.
    Pending,
    /// The message is complete; read it with [`Assembler::message`].
    Complete,
    /// The chunk was discarded along with any partial message.
    Dropped(DropReason),
}

/// Why a chunk was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The topic does not fit in [`MAX_TOPIC_LEN`] bytes.
    TopicTooLong,
    /// The payload does not fit in [`MAX_PAYLOAD_LEN`] bytes.
    PayloadTooLarge,
    /// A continuation chunk arrived without a first chunk.
    Orphan,
    /// A chunk's offset does not follow the bytes received so far.
    OutOfOrder,
}

/// Collects chunks of one message at a time.
#[derive(Debug, Default)]
pub struct Assembler {
    topic: String<MAX_TOPIC_LEN>,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    expected: usize,
    active: bool,
    complete: bool,
}

impl Assembler {
    /// Create an idle assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk.
    pub fn push(&mut self, data: &Data<'_>) -> Progress {
        self.complete = false;

        if data.offset == 0 {
            if self.active {
                warn!("discarding partially received message");
            }
            self.reset();
            if data.total_len > MAX_PAYLOAD_LEN {
                return Progress::Dropped(DropReason::PayloadTooLarge);
            }
            if self.topic.push_str(data.topic).is_err() {
                self.topic.clear();
                return Progress::Dropped(DropReason::TopicTooLong);
            }
            self.expected = data.total_len;
            self.active = true;
        } else if !self.active {
            return Progress::Dropped(DropReason::Orphan);
        } else if data.offset != self.payload.len() {
            self.reset();
            return Progress::Dropped(DropReason::OutOfOrder);
        }

        if self.payload.len() + data.payload.len() > self.expected
            || self.payload.extend_from_slice(data.payload).is_err()
        {
            self.reset();
            return Progress::Dropped(DropReason::PayloadTooLarge);
        }

        if self.payload.len() == self.expected {
            self.active = false;
            self.complete = true;
            Progress::Complete
        } else {
            Progress::Pending
        }
    }

    /// The last completed message, until the next chunk arrives.
    pub fn message(&self) -> Option<Message<'_>> {
        self.complete.then(|| Message {
            topic: self.topic.as_str(),
            payload: &self.payload,
        })
    }

    /// Whether a message is partially received.
    pub fn in_progress(&self) -> bool {
        self.active
    }

    /// Forget any partial or completed message.
    pub fn reset(&mut self) {
        self.topic.clear();
        self.payload.clear();
        self.expected = 0;
        self.active = false;
        self.complete = false;
    }
}

impl DropReason {
    /// Short description, for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::TopicTooLong => "topic too long",
            DropReason::PayloadTooLarge => "payload too large",
            DropReason::Orphan => "continuation without a first chunk",
            DropReason::OutOfOrder => "chunk out of order",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DropReason {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DropReason::TopicTooLong => defmt::write!(f, "TopicTooLong"),
            DropReason::PayloadTooLarge => defmt::write!(f, "PayloadTooLarge"),
            DropReason::Orphan => defmt::write!(f, "Orphan"),
            DropReason::OutOfOrder => defmt::write!(f, "OutOfOrder"),
        }
    }
}
