mod settings;

use config::{Config, ConfigError, Environment, File};
use tracing::debug;

use settings::PartialSettings;

pub use settings::{BrokerSettings, ServerSettings, Settings};

/// Environment variables override file values, e.g. `POLLSUB_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "POLLSUB";

/// Loads the configuration from `config/default` (any supported format, if
/// present) and environment variables, merged over default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as [`load_config`] but reads the optional file at `path`.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;
    let settings = partial.merge_over(Settings::default());
    debug!("loaded configuration: {settings:?}");

    Ok(settings)
}
