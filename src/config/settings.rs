use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Includes settings for both the HTTP server and the message broker.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub broker: BrokerSettings,
}

/// Configuration settings for the server.
///
/// Defines the address the HTTP server binds to and the log level.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Configuration settings for the broker.
///
/// Bounds every subscription buffer. A value of `0` disables that bound.
#[derive(Debug, Deserialize, Clone)]
pub struct BrokerSettings {
    pub max_buffered_messages: usize,
    pub message_ttl_secs: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled in from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub broker: Option<PartialBrokerSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialBrokerSettings {
    pub max_buffered_messages: Option<usize>,
    pub message_ttl_secs: Option<u64>,
}

impl Settings {
    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_level: "info".to_string(),
            },
            broker: BrokerSettings {
                max_buffered_messages: 1000,
                message_ttl_secs: 3600,
            },
        }
    }
}

impl PartialSettings {
    /// Overlay the values that were provided on top of `defaults`.
    pub fn merge_over(self, defaults: Settings) -> Settings {
        let server = self.server;
        let broker = self.broker;

        Settings {
            server: ServerSettings {
                host: server
                    .as_ref()
                    .and_then(|s| s.host.clone())
                    .unwrap_or(defaults.server.host),
                port: server
                    .as_ref()
                    .and_then(|s| s.port)
                    .unwrap_or(defaults.server.port),
                log_level: server
                    .as_ref()
                    .and_then(|s| s.log_level.clone())
                    .unwrap_or(defaults.server.log_level),
            },
            broker: BrokerSettings {
                max_buffered_messages: broker
                    .as_ref()
                    .and_then(|b| b.max_buffered_messages)
                    .unwrap_or(defaults.broker.max_buffered_messages),
                message_ttl_secs: broker
                    .as_ref()
                    .and_then(|b| b.message_ttl_secs)
                    .unwrap_or(defaults.broker.message_ttl_secs),
            },
        }
    }
}
