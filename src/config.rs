//! Runtime settings, taken from defaults and optionally overridden through the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const OUTPUT_DIR_VAR: &str = "FILECONV_OUTPUT_DIR";
pub const OFFICE_BIN_VAR: &str = "FILECONV_OFFICE_BIN";
pub const BIND_VAR: &str = "FILECONV_BIND";
pub const JPEG_QUALITY_VAR: &str = "FILECONV_JPEG_QUALITY";

pub const DEFAULT_OUTPUT_DIR: &str = "output_files";
pub const DEFAULT_OFFICE_BIN: &str = "soffice";
pub const DEFAULT_BIND: &str = "127.0.0.1:8002";
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },

    #[error("{var}='{value}' is not a valid socket address: {reason}")]
    InvalidBind {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{var}='{value}' must be a whole number between 1 and 100")]
    InvalidJpegQuality { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Where converted files are written. Created on first use. Default: `output_files`.
    pub output_dir: PathBuf,

    /// LibreOffice executable used for `.doc` → PDF. Default: `soffice` (looked up on `PATH`).
    pub office_binary: String,

    /// Address the HTTP service listens on. Default: `127.0.0.1:8002`.
    pub bind_address: SocketAddr,

    /// JPEG encoder quality, 1-100. Default: 75.
    pub jpeg_quality: u8,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            office_binary: DEFAULT_OFFICE_BIN.to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8002)),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from any key/value source; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(OUTPUT_DIR_VAR) {
            if dir.trim().is_empty() {
                return Err(ConfigError::Empty { var: OUTPUT_DIR_VAR });
            }
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(binary) = lookup(OFFICE_BIN_VAR) {
            if binary.trim().is_empty() {
                return Err(ConfigError::Empty { var: OFFICE_BIN_VAR });
            }
            config.office_binary = binary;
        }

        if let Some(bind) = lookup(BIND_VAR) {
            config.bind_address = bind.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidBind {
                    var: BIND_VAR,
                    value: bind.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(quality) = lookup(JPEG_QUALITY_VAR) {
            let parsed = quality.trim().parse::<u8>();
            config.jpeg_quality = match parsed {
                Ok(value @ 1..=100) => value,
                _ => {
                    return Err(ConfigError::InvalidJpegQuality {
                        var: JPEG_QUALITY_VAR,
                        value: quality,
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_office_binary(mut self, binary: impl Into<String>) -> Self {
        self.office_binary = binary.into();
        self
    }
}
