use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use unidash_core::Department;
use unidash_parser::schema::DEFAULT_DATA_FILE;

pub const DEFAULT_CONFIG_FILE: &str = "unidash.toml";
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000));

pub const ENV_DATA_PATH: &str = "UNIDASH_DATA_PATH";
pub const ENV_BIND: &str = "UNIDASH_BIND";
pub const ENV_LOG_FORMAT: &str = "UNIDASH_LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Shape of `unidash.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub data_path: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub log_format: Option<LogFormat>,
    pub departments: Option<Vec<String>>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub bind: Option<SocketAddr>,
    pub log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub bind: SocketAddr,
    pub log_format: LogFormat,
    /// Department breakdown used when a request does not name one.
    pub departments: Option<Vec<Department>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            bind: DEFAULT_BIND,
            log_format: LogFormat::Text,
            departments: None,
        }
    }
}

pub fn parse_file_config(toml_str: &str) -> Result<FileConfig> {
    toml::from_str::<FileConfig>(toml_str).context("failed to parse config TOML")
}

impl AppConfig {
    /// Layers defaults, the config file, environment and command-line
    /// overrides, in that order.
    ///
    /// An explicitly named config file must exist; the default
    /// `unidash.toml` is only read when present.
    pub fn resolve<F>(overrides: &Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        let file = match &overrides.config_path {
            Some(path) => Some(read_file_config(path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Some(read_file_config(path)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            config.apply_file(file)?;
        }

        if let Some(path) = env(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(bind) = env(ENV_BIND) {
            config.bind = bind
                .parse()
                .with_context(|| format!("{ENV_BIND} is not a socket address: '{bind}'"))?;
        }
        if let Some(format) = env(ENV_LOG_FORMAT) {
            config.log_format = format
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("{ENV_LOG_FORMAT} is invalid"))?;
        }

        if let Some(path) = &overrides.data_path {
            config.data_path = path.clone();
        }
        if let Some(bind) = overrides.bind {
            config.bind = bind;
        }
        if let Some(format) = overrides.log_format {
            config.log_format = format;
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<()> {
        if let Some(path) = file.data_path {
            self.data_path = path;
        }
        if let Some(bind) = file.bind {
            self.bind = bind;
        }
        if let Some(format) = file.log_format {
            self.log_format = format;
        }
        if let Some(names) = file.departments {
            let departments = names
                .iter()
                .map(|name| Department::try_from(name.as_str()))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(anyhow::Error::msg)
                .context("invalid department in config")?;
            self.departments = Some(departments);
        }
        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
    parse_file_config(&content)
        .with_context(|| format!("Failed to parse config from '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_without_file_or_env() {
        let overrides = Overrides {
            config_path: None,
            ..Default::default()
        };
        // The working directory of a test run has no unidash.toml.
        let config = AppConfig::resolve(&overrides, no_env).expect("resolve");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.bind.to_string(), "0.0.0.0:3000");
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn file_then_env_then_flags() {
        let file = config_file(
            r#"
data_path = "from_file.csv"
bind = "127.0.0.1:4000"
log_format = "json"
departments = ["Engineering", "Arts Enrolled"]
"#,
        );

        let overrides = Overrides {
            config_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let from_file = AppConfig::resolve(&overrides, no_env).expect("resolve file");
        assert_eq!(from_file.data_path, PathBuf::from("from_file.csv"));
        assert_eq!(from_file.bind.to_string(), "127.0.0.1:4000");
        assert_eq!(from_file.log_format, LogFormat::Json);
        assert_eq!(
            from_file.departments,
            Some(vec![Department::Engineering, Department::Arts])
        );

        let env: HashMap<&str, &str> = [
            (ENV_DATA_PATH, "from_env.csv"),
            (ENV_LOG_FORMAT, "text"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|value| value.to_string());
        let from_env = AppConfig::resolve(&overrides, lookup).expect("resolve env");
        assert_eq!(from_env.data_path, PathBuf::from("from_env.csv"));
        assert_eq!(from_env.log_format, LogFormat::Text);
        assert_eq!(from_env.bind.to_string(), "127.0.0.1:4000");

        let flags = Overrides {
            data_path: Some(PathBuf::from("from_flag.csv")),
            ..overrides
        };
        let from_flags = AppConfig::resolve(&flags, lookup).expect("resolve flags");
        assert_eq!(from_flags.data_path, PathBuf::from("from_flag.csv"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let overrides = Overrides {
            config_path: Some(PathBuf::from("/definitely/not/here/unidash.toml")),
            ..Default::default()
        };

        assert!(AppConfig::resolve(&overrides, no_env).is_err());
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        assert!(parse_file_config("colour = \"blue\"").is_err());
        assert!(parse_file_config("bind = \"not an address\"").is_err());

        let file = config_file("departments = [\"Medicine\"]");
        let overrides = Overrides {
            config_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&overrides, no_env).is_err());
    }

    #[test]
    fn bad_env_bind_is_an_error() {
        let lookup = |key: &str| (key == ENV_BIND).then(|| "nowhere".to_string());

        assert!(AppConfig::resolve(&Overrides::default(), lookup).is_err());
    }
}
