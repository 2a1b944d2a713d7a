//! Topic → (QoS, callback) registry.

use super::{MAX_SUBSCRIPTIONS, MAX_TOPIC_LEN, Message, QoS};
use heapless::{FnvIndexMap, String};

/// Callback invoked for messages on a subscribed topic.
///
/// Implemented for every `FnMut(&Message)`, so plain functions, closures and
/// `&mut dyn FnMut(&Message)` can be registered directly.
pub trait Handler {
    /// Handle one inbound message.
    fn on_message(&mut self, message: &Message<'_>);
}

impl<F> Handler for F
where
    F: FnMut(&Message<'_>),
{
    fn on_message(&mut self, message: &Message<'_>) {
        self(message)
    }
}

/// A registered subscription.
#[derive(Debug)]
pub struct Subscription<H> {
    /// QoS requested from the broker on every (re)subscribe.
    pub qos: QoS,
    /// Callback for messages on the topic.
    pub handler: H,
}

/// Errors returned when registering a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The topic is longer than [`MAX_TOPIC_LEN`].
    TopicTooLong,
    /// The topic is empty.
    EmptyTopic,
    /// [`MAX_SUBSCRIPTIONS`] topics are already registered.
    RegistryFull,
}

/// Subscriptions keyed by exact topic name.
#[derive(Debug)]
pub struct SubscriptionRegistry<H> {
    entries: FnvIndexMap<String<MAX_TOPIC_LEN>, Subscription<H>, MAX_SUBSCRIPTIONS>,
}

impl<H: Handler> SubscriptionRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
        }
    }

    /// Register `handler` for `topic`.
    ///
    /// Registering a topic again replaces its QoS and handler; the previous
    /// subscription is returned.
    pub fn register(
        &mut self,
        topic: &str,
        qos: QoS,
        handler: H,
    ) -> Result<Option<Subscription<H>>, RegistryError> {
        let key = topic_key(topic)?;
        self.entries
            .insert(key, Subscription { qos, handler })
            .map_err(|_| RegistryError::RegistryFull)
    }

    /// Remove the subscription for `topic`.
    pub fn remove(&mut self, topic: &str) -> Option<Subscription<H>> {
        let key = topic_key(topic).ok()?;
        self.entries.remove(&key)
    }

    /// Hand `message` to the handler registered for its topic.
    ///
    /// Topics are compared exactly. Returns `false` when no handler is
    /// registered for the topic.
    pub fn dispatch(&mut self, message: &Message<'_>) -> bool {
        let Ok(key) = topic_key(message.topic) else {
            return false;
        };

        match self.entries.get_mut(&key) {
            Some(subscription) => {
                subscription.handler.on_message(message);
                true
            }
            None => false,
        }
    }

    /// The subscription registered for `topic`, if any.
    pub fn get(&self, topic: &str) -> Option<&Subscription<H>> {
        let key = topic_key(topic).ok()?;
        self.entries.get(&key)
    }

    /// Whether a handler is registered for `topic`.
    pub fn contains(&self, topic: &str) -> bool {
        self.get(topic).is_some()
    }

    /// Registered topics with their QoS.
    pub fn iter(&self) -> impl Iterator<Item = (&str, QoS)> {
        self.entries
            .iter()
            .map(|(topic, subscription)| (topic.as_str(), subscription.qos))
    }

    /// Number of registered topics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no topic is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Handler> Default for SubscriptionRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

fn topic_key(topic: &str) -> Result<String<MAX_TOPIC_LEN>, RegistryError> {
    if topic.is_empty() {
        return Err(RegistryError::EmptyTopic);
    }
    String::try_from(topic).map_err(|_| RegistryError::TopicTooLong)
}

impl core::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RegistryError::TopicTooLong => f.write_str("topic too long"),
            RegistryError::EmptyTopic => f.write_str("empty topic"),
            RegistryError::RegistryFull => f.write_str("subscription registry full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}

#[cfg(feature = "defmt")]
impl defmt::Format for RegistryError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RegistryError::TopicTooLong => defmt::write!(f, "TopicTooLong"),
            RegistryError::EmptyTopic => defmt::write!(f, "EmptyTopic"),
            RegistryError::RegistryFull => defmt::write!(f, "RegistryFull"),
        }
    }
}

/// Register several subscriptions at once.
///
/// Works with anything exposing `subscribe(topic, qos, handler) -> Result`,
/// such as [`Client`](crate::mqtt::Client). Panics if a registration fails.
#[macro_export]
macro_rules! register_subscriptions {
    ($target:expr, $(($topic:expr, $qos:expr, $handler:expr)),+ $(,)?) => {
        $(
            $target
                .subscribe($topic, $qos, $handler)
                .expect("Failed to register MQTT subscription");
        )+
    };
}
