use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::client::ControlEndpoint;
use crate::workdir::Staging;

const DEFAULT_HOST: &str = "192.168.1.11";
const DEFAULT_PORT: u16 = 8200;
const DEFAULT_CONTROL_PATH: &str = "/ctl/ContentDir";
const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 2;
const DEFAULT_ALIVE_WINDOW_SECS: u64 = 5;
const DEFAULT_NOTIFY_WINDOW_SECS: u64 = 10;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REFERENCE_DIR: &str = "ref_xml";
const DEFAULT_WORK_DIR: &str = "dut_xml";

#[derive(Deserialize, Default, Debug)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub control_path: Option<String>,
    pub search_timeout_secs: Option<u64>,
    pub alive_window_secs: Option<u64>,
    pub notify_window_secs: Option<u64>,
    pub http_timeout_secs: Option<u64>,
    pub reference_dir: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub control_path: String,
    pub search_timeout: Duration,
    pub alive_window: Duration,
    pub notify_window: Duration,
    pub http_timeout: Duration,
    pub reference_dir: PathBuf,
    pub work_dir: PathBuf,
}

impl Config {
    /// CLI flag > TOML > built-in default.
    pub fn resolve(file: Option<FileConfig>, args: &crate::cli::Args) -> Self {
        let file = file.unwrap_or_default();
        let secs = |value: Option<u64>, default| Duration::from_secs(value.unwrap_or(default));
        Config {
            host: args
                .host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            control_path: file
                .control_path
                .unwrap_or_else(|| DEFAULT_CONTROL_PATH.to_string()),
            search_timeout: secs(file.search_timeout_secs, DEFAULT_SEARCH_TIMEOUT_SECS),
            alive_window: secs(file.alive_window_secs, DEFAULT_ALIVE_WINDOW_SECS),
            notify_window: secs(file.notify_window_secs, DEFAULT_NOTIFY_WINDOW_SECS),
            http_timeout: secs(file.http_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS),
            reference_dir: file
                .reference_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_DIR)),
            work_dir: file.work_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR)),
        }
    }

    pub fn control_endpoint(&self) -> ControlEndpoint {
        ControlEndpoint {
            host: self.host.clone(),
            port: self.port,
            path: self.control_path.clone(),
        }
    }

    pub fn staging(&self) -> Staging {
        Staging {
            reference_dir: self.reference_dir.clone(),
            work_dir: self.work_dir.clone(),
        }
    }
}

const CONFIG_FILE_NAME: &str = "dlnaprobe.toml";

/// Locations tried for the config file, most specific first: the `--config`
/// path, `./dlnaprobe.toml`, then `<config_dir>/dlnaprobe/config.toml`.
pub fn config_search_path(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = explicit.map(Path::to_path_buf).into_iter().collect();
    candidates.push(PathBuf::from(CONFIG_FILE_NAME));
    candidates.extend(dirs::config_dir().map(|dir| dir.join("dlnaprobe").join("config.toml")));
    candidates
}

/// An explicit `--config` path is returned even when it does not exist, so a
/// typo surfaces as a read error instead of silently falling back to defaults.
pub fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    config_search_path(None).into_iter().find(|candidate| candidate.is_file())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{}: {key} must be greater than zero", .path.display())]
    Zero { path: PathBuf, key: &'static str },
}

impl FileConfig {
    /// Zero ports and zero-length windows cannot reach or wait for a DUT.
    fn check(&self, path: &Path) -> Result<(), ConfigError> {
        let fields = [
            ("port", self.port.map(u64::from)),
            ("search_timeout_secs", self.search_timeout_secs),
            ("alive_window_secs", self.alive_window_secs),
            ("notify_window_secs", self.notify_window_secs),
            ("http_timeout_secs", self.http_timeout_secs),
        ];
        match fields.into_iter().find(|(_, value)| *value == Some(0)) {
            Some((key, _)) => Err(ConfigError::Zero {
                path: path.to_owned(),
                key,
            }),
            None => Ok(()),
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let config: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })?;
    config.check(path)?;
    Ok(config)
}
