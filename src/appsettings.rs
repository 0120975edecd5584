use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_STORAGE_KEY: &str = "reminder_app_items_v1";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub directory: PathBuf,
    pub key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub directory: PathBuf,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub export: ExportSettings,
}

impl AppSettings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_sources(
            Config::builder()
                .add_source(File::with_name("appsettings").required(false))
                .add_source(File::with_name("appsettings.local").required(false))
                .add_source(
                    Environment::with_prefix("APP")
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings = builder
            .set_default("storage.directory", ".reminders")?
            .set_default("storage.key", DEFAULT_STORAGE_KEY)?
            .set_default("export.directory", ".")?
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = AppSettings::from_sources(Config::builder()).unwrap();

        assert_eq!(settings.storage.directory, PathBuf::from(".reminders"));
        assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.export.directory, PathBuf::from("."));
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
[storage]
directory = "/tmp/reminders"

[export]
directory = "/tmp/exports"
"#;
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));

        let settings = AppSettings::from_sources(builder).unwrap();

        assert_eq!(settings.storage.directory, PathBuf::from("/tmp/reminders"));
        assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.export.directory, PathBuf::from("/tmp/exports"));
    }
}
