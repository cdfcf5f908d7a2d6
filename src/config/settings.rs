use serde::Deserialize;

/// Top-level configuration settings for the application.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub hub: HubSettings,
    pub logging: LoggingSettings,
}

/// Address the HTTP/WebSocket server binds to.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Location and startup policy of the message store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub path: String,
    /// Wipe all history when the server starts.
    pub reset_on_start: bool,
}

/// Per-viewer delivery limits.
///
/// `session_buffer` is the number of events queued for one viewer before it is
/// considered stalled and evicted. `write_timeout_ms` bounds a single socket write.
#[derive(Debug, Deserialize, Clone)]
pub struct HubSettings {
    pub session_buffer: usize,
    pub write_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub server: Option<PartialServerSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub hub: Option<PartialHubSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
    pub reset_on_start: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialHubSettings {
    pub session_buffer: Option<usize>,
    pub write_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            storage: StorageSettings {
                path: "feedboard_db".to_string(),
                reset_on_start: false,
            },
            hub: HubSettings {
                session_buffer: 64,
                write_timeout_ms: 5000,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
