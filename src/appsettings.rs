use config::{Config, ConfigError, Environment, File};
use memoria_models::settings::Settings;

/// Layers `appsettings`, the optional `appsettings.local` and `APP__*`
/// environment variables, later sources winning.
pub fn load() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("appsettings").required(true))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    settings.try_deserialize()
}
