//! User settings for the `bql` command.
//!
//! Read from `$HOME/.config/vysta-bql/config.json`:
//! ```json
//! {"format": true, "indent": 4, "conditionMode": "expressions"}
//! ```
//! Every key is optional. Without a config file we fall back to the defaults.
use crate::condition::ConditionMode;
use crate::writer::WriterOptions;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub format: bool,
    pub indent: usize,
    pub condition_mode: ConditionMode,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            format: false,
            indent: 2,
            condition_mode: ConditionMode::Values,
        }
    }
}

pub fn get_config_file_name(file: &str) -> Result<PathBuf, crate::Error> {
    let home = std::env::var("HOME")?;

    let mut path = PathBuf::from(home);
    path.push(".config");
    path.push("vysta-bql");
    path.push(file);

    Ok(path)
}

/// Reads the config from its default location.
pub fn read() -> Result<Config, crate::Error> {
    read_from(&get_config_file_name("config.json")?)
}

pub fn read_from(path: &Path) -> Result<Config, crate::Error> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());

        return Ok(Config::default());
    }

    info!("Reading config from {}", path.display());
    let config = serde_json::from_reader(fs::File::open(path)?)?;

    Ok(config)
}

impl Config {
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            format: self.format,
            indent: self.indent,
            condition_mode: self.condition_mode,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vysta-bql-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();

        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("vysta-bql-this-config-does-not-exist.json");

        assert_eq!(Config::default(), read_from(&path).unwrap());
    }

    #[test]
    fn test_read_config() {
        let path = temp_config(
            "full.json",
            r#"{"format": true, "indent": 4, "conditionMode": "expressions"}"#,
        );

        let config = read_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(
            Config {
                format: true,
                indent: 4,
                condition_mode: ConditionMode::Expressions,
            },
            config
        );
    }

    #[test]
    fn test_partial_config() {
        let path = temp_config("partial.json", r#"{"format": true}"#);

        let config = read_from(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(config.format);
        assert_eq!(2, config.indent);
    }

    #[test]
    fn test_invalid_config() {
        let path = temp_config("invalid.json", "{format: yes}");

        let error = read_from(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(error.kind(), ErrorKind::JsonError(_)));
    }

    #[test]
    fn test_writer_options() {
        let config = Config {
            format: true,
            indent: 4,
            condition_mode: ConditionMode::Expressions,
        };

        let options = config.writer_options();

        assert!(options.format);
        assert_eq!(4, options.indent);
        assert_eq!(0, options.nesting_level);
        assert_eq!(ConditionMode::Expressions, options.condition_mode);
    }

    #[test]
    fn test_config_file_location() {
        let path = get_config_file_name("config.json").unwrap();

        assert!(path.ends_with(".config/vysta-bql/config.json"));
    }
}
