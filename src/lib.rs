//! File Type Converter Library
//!
//! Converts a single local file to another type: images among JPEG, PNG, GIF
//! and BMP, plain text or legacy Word documents to PDF, and PDF to text saved
//! under a `.doc` name. The input's extension picks the converter.

pub mod classifier;
pub mod config;
pub mod converter;
pub mod image_processor;
pub mod office;
pub mod pdf_processor;
pub mod server;
pub mod types;

pub use classifier::classify;
pub use config::{ConfigError, ConverterConfig};
pub use converter::FileConverter;
pub use types::*;
