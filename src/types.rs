use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The conversion family an input file belongs to, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionFamily {
    Image,
    TextLike,
    Pdf,
    Unsupported,
}

impl fmt::Display for ConversionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConversionFamily::Image => "image",
            ConversionFamily::TextLike => "text",
            ConversionFamily::Pdf => "PDF",
            ConversionFamily::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Jpeg,
    Png,
    Gif,
    Bmp,
}

impl ImageTarget {
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ImageTarget::Jpeg => image::ImageFormat::Jpeg,
            ImageTarget::Png => image::ImageFormat::Png,
            ImageTarget::Gif => image::ImageFormat::Gif,
            ImageTarget::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Output formats a caller can ask for. Tokens are matched case-insensitively but
/// otherwise as given, so the token that names the output file is the one parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Image(ImageTarget),
    Pdf,
    /// "DOC": extracted text saved under a `.doc` name, not a binary Word file.
    LegacyText,
}

impl OutputFormat {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "JPEG" => Some(OutputFormat::Image(ImageTarget::Jpeg)),
            "PNG" => Some(OutputFormat::Image(ImageTarget::Png)),
            "GIF" => Some(OutputFormat::Image(ImageTarget::Gif)),
            "BMP" => Some(OutputFormat::Image(ImageTarget::Bmp)),
            "PDF" => Some(OutputFormat::Pdf),
            "DOC" => Some(OutputFormat::LegacyText),
            _ => None,
        }
    }
}

/// A single conversion request: which file, and which format to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input_path: PathBuf,
    output_format: String,
}

impl ConversionRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_format: impl Into<String>,
    ) -> Result<Self, ConversionError> {
        let input_path = input_path.into();
        if input_path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ConversionError::NoInputSelected);
        }

        Ok(Self {
            input_path,
            output_format: output_format.into(),
        })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// The format token exactly as supplied; used verbatim (lower-cased) as the output extension.
    pub fn output_format(&self) -> &str {
        &self.output_format
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    UnsupportedOutputFormat,
    UnsupportedInputFormat,
    ConversionFailed,
    NoInputSelected,
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Unsupported output format '{format}' for {family} files")]
    UnsupportedOutputFormat {
        format: String,
        family: ConversionFamily,
    },

    #[error("Unsupported input file type: {}", path.display())]
    UnsupportedInputFormat { path: PathBuf },

    #[error("{message}")]
    ConversionFailed { message: String },

    #[error("Please select an input file")]
    NoInputSelected,
}

impl ConversionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ConversionError::ConversionFailed {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::UnsupportedOutputFormat { .. } => ErrorKind::UnsupportedOutputFormat,
            ConversionError::UnsupportedInputFormat { .. } => ErrorKind::UnsupportedInputFormat,
            ConversionError::ConversionFailed { .. } => ErrorKind::ConversionFailed,
            ConversionError::NoInputSelected => ErrorKind::NoInputSelected,
        }
    }
}

impl From<std::io::Error> for ConversionError {
    fn from(err: std::io::Error) -> Self {
        ConversionError::failed(err.to_string())
    }
}

impl From<image::ImageError> for ConversionError {
    fn from(err: image::ImageError) -> Self {
        ConversionError::failed(err.to_string())
    }
}

impl From<lopdf::Error> for ConversionError {
    fn from(err: lopdf::Error) -> Self {
        ConversionError::failed(format!("PDF processing error: {}", err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedFile {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub format: String,
}

/// What a caller gets back from one conversion, ready to show to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success { output_path: String, message: String },
    Failure { kind: ErrorKind, message: String },
}

impl ConversionOutcome {
    pub fn from_result(input: &Path, result: Result<ConvertedFile, ConversionError>) -> Self {
        match result {
            Ok(converted) => ConversionOutcome::Success {
                message: format!(
                    "Conversion successful: {} -> {}",
                    converted.input_path.display(),
                    converted.output_path.display()
                ),
                output_path: converted.output_path.display().to_string(),
            },
            Err(err) => ConversionOutcome::failure(input, &err),
        }
    }

    pub fn failure(input: &Path, err: &ConversionError) -> Self {
        let message = match err {
            ConversionError::ConversionFailed { .. } => {
                format!("Error converting {}: {}", input.display(), err)
            }
            _ => err.to_string(),
        };

        ConversionOutcome::Failure {
            kind: err.kind(),
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }
}

/// JSON body of `POST /convert`.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub input_path: String,
    #[serde(default)]
    pub output_format: String,
}

#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub jpeg_quality: u8, // 1-100
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: crate::config::DEFAULT_JPEG_QUALITY,
        }
    }
}
