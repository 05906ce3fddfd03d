use dotenvy::dotenv;
use rumqttc::QoS;
use std::env;
use thiserror::Error;

pub const DEFAULT_MQTT_HOST: &str = "broker.hivemq.com";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;
pub const DEFAULT_TOPIC: &str = "si-labs";
pub const DEFAULT_CLIENT_ID_PREFIX: &str = "si-labs-subscriber";
/// Largest remaining length an MQTT fixed header can encode.
pub const MAX_MQTT_PACKET_SIZE: usize = 268_435_455;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_keep_alive_secs: u64,
    pub mqtt_max_packet_size: usize,
    pub mqtt_client_id_prefix: String,
    pub mqtt_qos: QoS,

    pub topic: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is missing or invalid.")]
    MissingOrInvalid(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt_host: DEFAULT_MQTT_HOST.to_string(),
            mqtt_port: DEFAULT_MQTT_PORT,
            mqtt_keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
            mqtt_max_packet_size: MAX_MQTT_PACKET_SIZE,
            mqtt_client_id_prefix: DEFAULT_CLIENT_ID_PREFIX.to_string(),
            mqtt_qos: QoS::AtMostOnce,
            topic: DEFAULT_TOPIC.to_string(),
        }
    }
}

impl Config {
    /// Reject values that do not fit the MQTT 3.1.1 CONNECT and fixed header.
    /// A keep-alive of 0 disables pings.
    fn validate(&self) -> Result<(), ConfigError> {
        const MAX_KEEP_ALIVE: u64 = u16::MAX as u64;

        if self.mqtt_keep_alive_secs > MAX_KEEP_ALIVE {
            return Err(ConfigError::ParsingError(format!(
                "MQTT_KEEP_ALIVE_SECS must be at most {} seconds",
                MAX_KEEP_ALIVE
            )));
        }
        if !(1..=MAX_MQTT_PACKET_SIZE).contains(&self.mqtt_max_packet_size) {
            return Err(ConfigError::ParsingError(format!(
                "MQTT_MAX_PACKET_SIZE must be between 1 and {} bytes",
                MAX_MQTT_PACKET_SIZE
            )));
        }
        if self.mqtt_host.trim().is_empty() {
            return Err(ConfigError::MissingOrInvalid("MQTT_HOST".to_string()));
        }
        if self.mqtt_port == 0 {
            return Err(ConfigError::ParsingError("MQTT_PORT must not be 0".to_string()));
        }
        if self.topic.is_empty() {
            return Err(ConfigError::MissingOrInvalid("MQTT_TOPIC".to_string()));
        }

        Ok(())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load environment variables from .env file

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys fall
    /// back to the compiled-in broker, port, keep-alive and topic.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            mqtt_host: lookup("MQTT_HOST").unwrap_or(defaults.mqtt_host),
            mqtt_port: match lookup("MQTT_PORT") {
                Some(port) => port
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::ParsingError("MQTT_PORT must be a valid number".to_string()))?,
                None => defaults.mqtt_port,
            },
            mqtt_keep_alive_secs: match lookup("MQTT_KEEP_ALIVE_SECS") {
                Some(secs) => secs
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::ParsingError("MQTT_KEEP_ALIVE_SECS must be a valid number".to_string()))?,
                None => defaults.mqtt_keep_alive_secs,
            },
            mqtt_max_packet_size: match lookup("MQTT_MAX_PACKET_SIZE") {
                Some(size) => size
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ConfigError::ParsingError("MQTT_MAX_PACKET_SIZE must be a valid number".to_string()))?,
                None => defaults.mqtt_max_packet_size,
            },
            mqtt_client_id_prefix: lookup("MQTT_CLIENT_ID_PREFIX").unwrap_or(defaults.mqtt_client_id_prefix),
            mqtt_qos: match lookup("MQTT_QOS") {
                Some(qos) => parse_qos(qos.trim())?,
                None => defaults.mqtt_qos,
            },

            topic: lookup("MQTT_TOPIC").unwrap_or(defaults.topic),
        };

        config.validate()?;

        Ok(config)
    }
}

fn parse_qos(value: &str) -> Result<QoS, ConfigError> {
    match value {
        "0" => Ok(QoS::AtMostOnce),
        "1" => Ok(QoS::AtLeastOnce),
        "2" => Ok(QoS::ExactlyOnce),
        _ => Err(ConfigError::ParsingError("MQTT_QOS must be 0, 1 or 2".to_string())),
    }
}
