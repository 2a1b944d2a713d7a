//! Recording engine and handler used by the client tests.

#![allow(dead_code)]

use mqtt_dispatch::mqtt::{Config, Engine, Handler, Init, Message, MessageId, QoS};
use std::cell::RefCell;

/// Errors the mock engine can be told to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    StartFailed,
    Rejected,
}

/// A publish request seen by the mock engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Engine that records every request instead of talking to a broker
#[derive(Debug, Default)]
pub struct MockEngine {
    pub started: bool,
    pub fail_start: bool,
    pub reject_topic: Option<String>,
    pub subscribes: Vec<(String, QoS)>,
    pub unsubscribes: Vec<String>,
    pub publishes: Vec<Publish>,
    next_id: MessageId,
}

impl MockEngine {
    /// Create an engine that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that refuses requests for `topic`
    pub fn rejecting(topic: &str) -> Self {
        Self {
            reject_topic: Some(topic.to_string()),
            ..Self::default()
        }
    }

    /// Create an engine whose `start` fails
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    fn check(&mut self, topic: &str) -> Result<MessageId, MockError> {
        if self.reject_topic.as_deref() == Some(topic) {
            return Err(MockError::Rejected);
        }
        self.next_id += 1;
        Ok(self.next_id)
    }

    /// Topics subscribed so far, in order
    pub fn subscribed_topics(&self) -> Vec<&str> {
        self.subscribes.iter().map(|(t, _)| t.as_str()).collect()
    }
}

impl Engine for MockEngine {
    type Error = MockError;

    fn start(&mut self) -> Result<(), Self::Error> {
        if self.fail_start {
            return Err(MockError::StartFailed);
        }
        self.started = true;
        Ok(())
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<MessageId, Self::Error> {
        let id = self.check(topic)?;
        self.publishes.push(Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
            qos,
            retain,
        });
        Ok(id)
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<MessageId, Self::Error> {
        let id = self.check(topic)?;
        self.subscribes.push((topic.to_string(), qos));
        Ok(id)
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<MessageId, Self::Error> {
        let id = self.check(topic)?;
        self.unsubscribes.push(topic.to_string());
        Ok(id)
    }
}

/// Platform stand-in that builds mock engines and remembers the endpoint
#[derive(Debug, Default)]
pub struct MockStack {
    pub inits: usize,
    pub last_client_id: Option<String>,
}

impl Init for MockStack {
    type Engine = MockEngine;

    fn init(&mut self, config: &Config<'_>) -> Result<MockEngine, MockError> {
        self.inits += 1;
        self.last_client_id = config.resolved_client_id().map(str::to_string);
        Ok(MockEngine::new())
    }
}

/// Handler that appends every message it receives to a shared log
#[derive(Debug)]
pub struct Recorder<'a> {
    pub log: &'a RefCell<Vec<(String, Vec<u8>)>>,
}

impl<'a> Recorder<'a> {
    pub fn new(log: &'a RefCell<Vec<(String, Vec<u8>)>>) -> Self {
        Self { log }
    }
}

impl Handler for Recorder<'_> {
    fn on_message(&mut self, message: &Message<'_>) {
        self.log
            .borrow_mut()
            .push((message.topic.to_string(), message.payload.to_vec()));
    }
}
