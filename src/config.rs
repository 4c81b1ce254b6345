use std::{
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::StartupError, server::DEFAULT_PORT};

/// The configuration used for running the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The address to listen on.
    pub bind_address: IpAddr,

    /// The port to listen on.
    pub port: u16,

    /// Where users are persisted.
    /// If not given, users only live as long as the server.
    pub store_path: Option<PathBuf>,

    /// If given, logs are also written to daily rotated files in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            store_path: None,
            log_dir: None,
        }
    }
}

impl Config {
    fn ron() -> ron::Options {
        ron::Options::default()
            .with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
            .with_default_extension(ron::extensions::Extensions::UNWRAP_NEWTYPES)
    }

    /// Deserialize a .ron file's contents.
    pub fn deserialize(input: &str) -> Result<Self, StartupError> {
        Ok(Self::ron().from_str::<Config>(input)?)
    }

    /// An example configuration with some fields filled in.
    pub fn example() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            store_path: Some("users.ron".into()),
            log_dir: Some("logs".into()),
        }
    }

    /// Serialize the configuration in a "pretty" (i.e. non-compact) fashion.
    pub fn serialize_pretty(&self) -> String {
        Self::ron()
            .to_string_pretty(self, ron::ser::PrettyConfig::default())
            .expect("A config is always representable as RON")
    }

    /// Setup a new configuration from a RON file.
    pub fn new_from_path<P: AsRef<Path>>(p: P) -> Result<Self, StartupError> {
        let path = p.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| StartupError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        Self::deserialize(&s)
    }

    fn check_store_path(&self) -> Result<(), StartupError> {
        match &self.store_path {
            Some(path) if path.is_dir() => Err(StartupError::BadConfig(format!(
                "The store path {path:?} is a directory, please point it at a file (it will be created if missing)."
            ))),
            _ => Ok(()),
        }
    }

    fn check_log_dir(&self) -> Result<(), StartupError> {
        match &self.log_dir {
            Some(dir) if dir.is_file() => Err(StartupError::BadConfig(format!(
                "The log directory {dir:?} is a file, please point it at a directory."
            ))),
            _ => Ok(()),
        }
    }

    /// Check the configuration is usable before starting anything with it.
    pub fn validate(&self) -> Result<(), StartupError> {
        self.check_store_path()?;
        self.check_log_dir()?;

        Ok(())
    }
}
