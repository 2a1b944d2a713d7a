//! The topic-keyed client adapter.
//!
//! [`Client`] sits between application code and the host's MQTT engine. It
//! never talks to the network itself: publishes and subscribe requests are
//! passed straight to the [`Engine`], and the engine's notifications come back
//! through [`Client::handle_event`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use mqtt_dispatch::mqtt::{Client, Config, Engine, Event, Init, Message, MessageId, QoS};
//! # struct HostEngine;
//! # impl Engine for HostEngine {
//! #     type Error = ();
//! #     fn start(&mut self) -> Result<(), ()> { Ok(()) }
//! #     fn publish(&mut self, _: &str, _: &[u8], _: QoS, _: bool) -> Result<MessageId, ()> { Ok(0) }
//! #     fn subscribe(&mut self, _: &str, _: QoS) -> Result<MessageId, ()> { Ok(0) }
//! #     fn unsubscribe(&mut self, _: &str) -> Result<MessageId, ()> { Ok(0) }
//! # }
//! # struct HostStack;
//! # impl Init for HostStack {
//! #     type Engine = HostEngine;
//! #     fn init(&mut self, _: &Config<'_>) -> Result<HostEngine, ()> { Ok(HostEngine) }
//! # }
//!
//! use mqtt_dispatch::mqtt::Handler;
//!
//! struct DoorCounter {
//!     openings: u32,
//! }
//!
//! impl Handler for DoorCounter {
//!     fn on_message(&mut self, message: &Message<'_>) {
//!         if message.payload == b"open" {
//!             self.openings += 1;
//!         }
//!     }
//! }
//!
//! let mut client: Client<HostEngine, DoorCounter> = Client::new();
//! client
//!     .subscribe("sensors/door", QoS::AtLeastOnce, DoorCounter { openings: 0 })
//!     .unwrap();
//!
//! let config = Config::host("broker.local", 1883, "door-controller");
//! client.begin(&mut HostStack, &config).unwrap();
//! ```

use super::{
    Assembler, Config, Data, Engine, Error, ErrorInfo, ErrorKind, Event, Handler, Init, Message,
    MessageId, Progress, QoS, SubscriptionRegistry,
};

/// Connection state as last reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No engine started yet.
    Idle,
    /// The engine is started and connecting.
    Connecting,
    /// The broker accepted the session.
    Connected,
    /// The connection was lost; the engine reconnects on its own.
    Disconnected,
}

/// Topic-keyed publish/subscribe adapter over an [`Engine`].
#[derive(Debug)]
pub struct Client<E, H> {
    engine: Option<E>,
    registry: SubscriptionRegistry<H>,
    assembler: Assembler,
    state: State,
}

impl<E: Engine, H: Handler> Client<E, H> {
    /// Create a client with no subscriptions and no engine.
    pub fn new() -> Self {
        Self::with_registry(SubscriptionRegistry::new())
    }

    /// Create a client around an already populated registry.
    pub fn with_registry(registry: SubscriptionRegistry<H>) -> Self {
        Self {
            engine: None,
            registry,
            assembler: Assembler::new(),
            state: State::Idle,
        }
    }

    /// Initialize an engine for `config` and start it.
    pub fn begin<I>(&mut self, init: &mut I, config: &Config<'_>) -> Result<(), Error<E::Error>>
    where
        I: Init<Engine = E>,
    {
        if self.engine.is_some() {
            return Err(Error::AlreadyStarted);
        }
        config.validate()?;

        let engine = init.init(config).map_err(Error::Engine)?;
        self.attach(engine)
    }

    /// Start an already initialized engine and take ownership of it.
    pub fn attach(&mut self, mut engine: E) -> Result<(), Error<E::Error>> {
        if self.engine.is_some() {
            return Err(Error::AlreadyStarted);
        }

        engine.start().map_err(Error::Engine)?;
        info!(
            "engine started with {} registered subscriptions",
            self.registry.len()
        );

        self.engine = Some(engine);
        self.state = State::Connecting;
        Ok(())
    }

    /// Register `handler` for messages on `topic`.
    ///
    /// The subscription is sent to the engine on every connect. When the
    /// client is already connected it is also sent right away; if that
    /// request fails the error is returned but the subscription stays
    /// registered for the next connect.
    pub fn subscribe(&mut self, topic: &str, qos: QoS, handler: H) -> Result<(), Error<E::Error>> {
        self.registry.register(topic, qos, handler)?;

        if self.state != State::Connected {
            return Ok(());
        }
        if let Some(engine) = self.engine.as_mut() {
            let msg_id = engine.subscribe(topic, qos).map_err(Error::Engine)?;
            debug!("subscribe sent for {}, msg_id={}", topic, msg_id);
        }
        Ok(())
    }

    /// Drop the subscription for `topic`.
    ///
    /// Returns whether the topic was registered. The broker is told only when
    /// the client is connected; if that request fails the error is returned
    /// and the subscription stays registered.
    pub fn unsubscribe(&mut self, topic: &str) -> Result<bool, Error<E::Error>> {
        if !self.registry.contains(topic) {
            return Ok(false);
        }

        if self.state == State::Connected {
            if let Some(engine) = self.engine.as_mut() {
                let msg_id = engine.unsubscribe(topic).map_err(Error::Engine)?;
                debug!("unsubscribe sent for {}, msg_id={}", topic, msg_id);
            }
        }
        self.registry.remove(topic);
        Ok(true)
    }

    /// Publish `payload` on `topic` through the engine.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<MessageId, Error<E::Error>> {
        let engine = self.engine.as_mut().ok_or(Error::NotStarted)?;
        let msg_id = engine
            .publish(topic, payload, qos, retain)
            .map_err(Error::Engine)?;
        trace!(
            "published {} bytes to {}, msg_id={}",
            payload.len(),
            topic,
            msg_id
        );
        Ok(msg_id)
    }

    /// Feed one engine notification to the client.
    ///
    /// This is the engine's event sink. Nothing here fails: problems are
    /// logged and the event is dropped.
    pub fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::BeforeConnect => {
                debug!("connecting to broker");
                self.state = State::Connecting;
            }
            Event::Connected => {
                info!("connected to broker");
                self.state = State::Connected;
                self.replay_subscriptions();
            }
            Event::Disconnected => {
                info!("disconnected from broker");
                self.state = State::Disconnected;
                if self.assembler.in_progress() {
                    warn!("discarding partially received message");
                }
                self.assembler.reset();
            }
            Event::Subscribed(msg_id) => info!("subscribe acknowledged, msg_id={}", msg_id),
            Event::Unsubscribed(msg_id) => info!("unsubscribe acknowledged, msg_id={}", msg_id),
            Event::Published(msg_id) => info!("publish acknowledged, msg_id={}", msg_id),
            Event::Data(data) => self.handle_data(&data),
            Event::Error(info) => log_engine_error(&info),
            Event::Other(id) => info!("unhandled engine event {}", id),
        }
    }

    /// Last connection state reported by the engine.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the engine reported an open session.
    pub fn is_connected(&self) -> bool {
        self.state == State::Connected
    }

    /// The registered subscriptions.
    pub fn registry(&self) -> &SubscriptionRegistry<H> {
        &self.registry
    }

    /// The running engine, if started.
    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Mutable access to the running engine, if started.
    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    fn replay_subscriptions(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            warn!("connected event without a started engine");
            return;
        };

        let mut sent = 0usize;
        for (topic, qos) in self.registry.iter() {
            match engine.subscribe(topic, qos) {
                Ok(msg_id) => {
                    sent += 1;
                    debug!("resubscribed to {}, msg_id={}", topic, msg_id);
                }
                Err(_) => error!("resubscribing to {} failed", topic),
            }
        }
        info!("replayed {} of {} subscriptions", sent, self.registry.len());
    }

    fn handle_data(&mut self, data: &Data<'_>) {
        trace!("data event on {}", data.topic);

        if data.is_complete() {
            if self.assembler.in_progress() {
                warn!("discarding partially received message");
            }
            self.assembler.reset();
            let message = Message {
                topic: data.topic,
                payload: data.payload,
            };
            dispatch(&mut self.registry, &message);
            return;
        }

        match self.assembler.push(data) {
            Progress::Pending => trace!(
                "received chunk at offset {} of {} bytes",
                data.offset,
                data.total_len
            ),
            Progress::Complete => {
                if let Some(message) = self.assembler.message() {
                    dispatch(&mut self.registry, &message);
                }
            }
            Progress::Dropped(reason) => warn!("dropping message data: {}", reason.as_str()),
        }
    }
}

impl<E: Engine, H: Handler> Default for Client<E, H> {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch<H: Handler>(registry: &mut SubscriptionRegistry<H>, message: &Message<'_>) {
    if !registry.dispatch(message) {
        warn!("no callback for topic {}", message.topic);
    }
}

fn log_engine_error(info: &ErrorInfo) {
    error!("engine reported an error");
    match info.kind {
        ErrorKind::TcpTransport => {
            log_error_if_nonzero("reported from tls", info.tls_last_error);
            log_error_if_nonzero("reported from tls stack", info.tls_stack_error);
            log_error_if_nonzero("captured as transport's socket errno", info.socket_errno);
        }
        ErrorKind::ConnectionRefused => error!(
            "connection refused, return code {}",
            info.connect_return_code
        ),
        ErrorKind::Unknown => error!("unknown engine error"),
    }
}

fn log_error_if_nonzero(message: &str, code: i32) {
    if code != 0 {
        error!("last error {}: {}", message, code);
    }
}
