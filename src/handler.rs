use crate::error::SubscriberError;
use crate::models::{result_code, InboundMessage};
use log::debug;
use rumqttc::{AsyncClient, ClientError, ConnectReturnCode, QoS};
use std::io::Write;

/// Anything that can queue a SUBSCRIBE request without awaiting.
pub trait Subscribe {
    fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), ClientError>;
}

impl Subscribe for AsyncClient {
    fn subscribe(&self, topic: &str, qos: QoS) -> Result<(), ClientError> {
        self.try_subscribe(topic, qos)
    }
}

/// Callbacks driven by the subscriber's event loop.
pub trait EventHandler {
    /// Called once the broker has answered the CONNECT.
    fn on_connect<C: Subscribe>(
        &mut self,
        code: ConnectReturnCode,
        client: &C,
    ) -> Result<(), SubscriberError>;

    /// Called for every PUBLISH received.
    fn on_message(&mut self, message: &InboundMessage) -> Result<(), SubscriberError>;
}

/// Prints connection and message lines to a writer (stdout in production).
pub struct ConsoleHandler<W> {
    out: W,
    topic: String,
    qos: QoS,
}

impl<W: Write> ConsoleHandler<W> {
    pub fn new(out: W, topic: impl Into<String>, qos: QoS) -> Self {
        Self {
            out,
            topic: topic.into(),
            qos,
        }
    }
}

impl<W: Write> EventHandler for ConsoleHandler<W> {
    fn on_connect<C: Subscribe>(
        &mut self,
        code: ConnectReturnCode,
        client: &C,
    ) -> Result<(), SubscriberError> {
        writeln!(self.out, "Connected with result code: {}", result_code(code))?;
        writeln!(self.out, "Subscribing to topic: {}", self.topic)?;
        self.out.flush()?;

        client
            .subscribe(&self.topic, self.qos)
            .map_err(|source| SubscriberError::Subscribe {
                topic: self.topic.clone(),
                source,
            })?;
        debug!("Subscribe request for '{}' queued.", self.topic);
        Ok(())
    }

    fn on_message(&mut self, message: &InboundMessage) -> Result<(), SubscriberError> {
        let text = message.text().map_err(|source| SubscriberError::Decode {
            topic: message.topic.clone(),
            source,
        })?;
        writeln!(self.out, "Received message: {}", text)?;
        self.out.flush()?;
        Ok(())
    }
}
