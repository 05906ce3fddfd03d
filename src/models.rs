use rumqttc::{ConnectReturnCode, Publish};
use std::str::Utf8Error;

/// A PUBLISH delivered on the subscription. The payload stays opaque until
/// the handler decodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    pub fn text(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.payload)
    }
}

impl From<Publish> for InboundMessage {
    fn from(publish: Publish) -> Self {
        Self::new(publish.topic, publish.payload.to_vec())
    }
}

/// Numeric CONNACK return code as defined by MQTT 3.1.1.
pub fn result_code(code: ConnectReturnCode) -> u8 {
    match code {
        ConnectReturnCode::Success => 0,
        ConnectReturnCode::RefusedProtocolVersion => 1,
        ConnectReturnCode::BadClientId => 2,
        ConnectReturnCode::ServiceUnavailable => 3,
        ConnectReturnCode::BadUserNamePassword => 4,
        ConnectReturnCode::NotAuthorized => 5,
    }
}
