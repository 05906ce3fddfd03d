use crate::config::Config;
use crate::error::SubscriberError;
use crate::handler::{EventHandler, Subscribe};
use crate::models::{result_code, InboundMessage};
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Packet, SubscribeReasonCode};
use std::future::Future;
use tokio::time::Duration;

const REQUEST_CHANNEL_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Disconnected,
    Connected,
}

/// Owns the client handle, its event loop and the handler the loop feeds.
/// Dropping it closes the connection.
pub struct Subscriber<H> {
    client: AsyncClient,
    eventloop: EventLoop,
    handler: H,
    client_state: ClientState,
}

impl<H: EventHandler> Subscriber<H> {
    pub fn new(config: &Config, client_id: &str, handler: H) -> Self {
        debug!(
            "Configuring MQTT broker at {}:{} as '{}'...",
            config.mqtt_host, config.mqtt_port, client_id
        );

        let mut mqtt_options = MqttOptions::new(client_id, config.mqtt_host.as_str(), config.mqtt_port);
        mqtt_options.set_keep_alive(Duration::from_secs(config.mqtt_keep_alive_secs));
        mqtt_options.set_clean_session(true);
        mqtt_options.set_max_packet_size(config.mqtt_max_packet_size, config.mqtt_max_packet_size);

        let (client, eventloop) = AsyncClient::new(mqtt_options, REQUEST_CHANNEL_CAPACITY);

        Self {
            client,
            eventloop,
            handler,
            client_state: ClientState::Disconnected,
        }
    }

    pub fn state(&self) -> ClientState {
        self.client_state
    }

    /// Poll the event loop and dispatch every event until one of them fails.
    /// The connection is opened on the first poll.
    pub async fn run(&mut self) -> Result<(), SubscriberError> {
        info!("Starting MQTT subscriber...");

        loop {
            let polled = self.eventloop.poll().await;
            dispatch(&mut self.handler, &self.client, &mut self.client_state, polled)?;
        }
    }

    /// Like [`Subscriber::run`], but returns `Ok(())` as soon as `shutdown`
    /// completes. Events still buffered at that point are not dispatched.
    pub async fn run_until_shutdown<F>(&mut self, shutdown: F) -> Result<(), SubscriberError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = shutdown => {
                info!("Shutdown requested, leaving the MQTT event loop.");
                Ok(())
            }
            result = self.run() => result,
        }
    }
}

fn dispatch<H, C>(
    handler: &mut H,
    client: &C,
    client_state: &mut ClientState,
    polled: Result<Event, ConnectionError>,
) -> Result<(), SubscriberError>
where
    H: EventHandler,
    C: Subscribe,
{
    match polled {
        Ok(Event::Incoming(Packet::ConnAck(connack))) => {
            info!("Connected to MQTT broker.");
            *client_state = ClientState::Connected;
            handler.on_connect(connack.code, client)
        }
        Ok(Event::Incoming(Packet::Publish(publish))) => {
            debug!("Incoming message on '{}' ({} bytes).", publish.topic, publish.payload.len());
            handler.on_message(&InboundMessage::from(publish))
        }
        Ok(Event::Incoming(Packet::SubAck(suback))) => {
            if suback.return_codes.contains(&SubscribeReasonCode::Failure) {
                warn!("Broker rejected subscription (pkid {}).", suback.pkid);
            } else {
                info!("Subscription acknowledged (pkid {}).", suback.pkid);
            }
            Ok(())
        }
        Ok(Event::Outgoing(outgoing)) => {
            debug!("Outgoing event: {:?}", outgoing);
            Ok(())
        }
        Ok(event) => {
            debug!("Unhandled event: {:?}", event);
            Ok(())
        }
        Err(ConnectionError::ConnectionRefused(code)) => {
            warn!("MQTT broker refused the connection with code {}.", result_code(code));
            if let Err(e) = handler.on_connect(code, client) {
                warn!("Failed to report refused connection: {}", e);
            }
            Err(ConnectionError::ConnectionRefused(code).into())
        }
        Err(e) => {
            error!("Error in MQTT event loop: {:?}", e);
            *client_state = ClientState::Disconnected;
            Err(e.into())
        }
    }
}
