mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{HubSettings, LoggingSettings, ServerSettings, Settings, StorageSettings};

/// Environment variable prefix, e.g. `FEEDBOARD__SERVER__PORT=4000`.
pub const ENV_PREFIX: &str = "FEEDBOARD";

/// Loads the configuration from `config/default.*` and `FEEDBOARD__*` environment
/// variables, merged over `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(merge(partial, Settings::default()))
}

fn merge(partial: PartialSettings, default: Settings) -> Settings {
    let server = partial.server.as_ref();
    let storage = partial.storage.as_ref();
    let hub = partial.hub.as_ref();
    let logging = partial.logging.as_ref();

    Settings {
        server: ServerSettings {
            host: server
                .and_then(|s| s.host.clone())
                .unwrap_or(default.server.host),
            port: server.and_then(|s| s.port).unwrap_or(default.server.port),
        },
        storage: StorageSettings {
            path: storage
                .and_then(|s| s.path.clone())
                .unwrap_or(default.storage.path),
            reset_on_start: storage
                .and_then(|s| s.reset_on_start)
                .unwrap_or(default.storage.reset_on_start),
        },
        hub: HubSettings {
            session_buffer: hub
                .and_then(|h| h.session_buffer)
                .filter(|n| *n > 0)
                .unwrap_or(default.hub.session_buffer),
            write_timeout_ms: hub
                .and_then(|h| h.write_timeout_ms)
                .unwrap_or(default.hub.write_timeout_ms),
        },
        logging: LoggingSettings {
            level: logging
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    }
}
