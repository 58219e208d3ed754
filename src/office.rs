//! Legacy Word (`.doc`) to PDF through a headless LibreOffice process.
//!
//! The conversion itself is opaque: we run `soffice`, check its exit status,
//! and report whatever it printed on failure.

use crate::types::ConversionError;
use std::path::{Path, PathBuf};
use std::process::Command;

pub struct OfficeConverter {
    binary: String,
}

impl OfficeConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Convert `input` to PDF inside `out_dir`. Returns `<out_dir>/<stem>.pdf`.
    pub fn convert_to_pdf(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, ConversionError> {
        log::info!("Handing {} to {}", input.display(), self.binary);

        let output = Command::new(&self.binary)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .output()
            .map_err(|e| {
                ConversionError::failed(format!(
                    "Failed to execute '{}': {}. Ensure LibreOffice is installed and accessible.",
                    self.binary, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConversionError::failed(format!(
                "Document conversion failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let stem = input
            .file_stem()
            .ok_or_else(|| ConversionError::failed("Invalid input filename"))?;
        let mut pdf_path = out_dir.join(stem);
        pdf_path.set_extension("pdf");

        log::debug!("{} reported success for {}", self.binary, pdf_path.display());
        Ok(pdf_path)
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new("soffice")
    }
}
