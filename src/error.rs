use rumqttc::{ClientError, ConnectionError};
use std::str::Utf8Error;
use thiserror::Error;

/// Every way a subscriber run can end other than a termination signal.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("MQTT connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Failed to subscribe to topic '{topic}': {source}")]
    Subscribe {
        topic: String,
        #[source]
        source: ClientError,
    },
    #[error("Payload on topic '{topic}' is not valid UTF-8: {source}")]
    Decode {
        topic: String,
        #[source]
        source: Utf8Error,
    },
    #[error("Failed to write to console: {0}")]
    Output(#[from] std::io::Error),
}
