//! MQTT bus configuration.

use serde::Deserialize;

use autowater_domain::topic::DEFAULT_BASE_TOPIC;

/// Configuration for the MQTT bus connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Base topic prefix for the water, humidity and pump topics.
    pub base_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Capacity of the client request channel.
    pub channel_capacity: usize,
    /// Delay before polling again after a connection error, in milliseconds.
    pub reconnect_delay_ms: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "Watering_system".to_string(),
            base_topic: DEFAULT_BASE_TOPIC.to_string(),
            keep_alive_secs: 30,
            channel_capacity: 64,
            reconnect_delay_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "Watering_system");
        assert_eq!(config.base_topic, "Watering_system");
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.reconnect_delay_ms, 1000);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            broker_host = "mqtt.example.com"
            broker_port = 8883
            client_id = "greenhouse"
            base_topic = "garden"
            keep_alive_secs = 60
            channel_capacity = 16
            reconnect_delay_ms = 250
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "mqtt.example.com");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "greenhouse");
        assert_eq!(config.base_topic, "garden");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.channel_capacity, 16);
        assert_eq!(config.reconnect_delay_ms, 250);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "Watering_system");
    }
}
