use crate::classifier::{self, classify};
use crate::config::ConverterConfig;
use crate::image_processor::ImageProcessor;
use crate::office::OfficeConverter;
use crate::pdf_processor::PdfProcessor;
use crate::types::*;
use std::path::{Path, PathBuf};

pub struct FileConverter {
    output_dir: PathBuf,
    image_processor: ImageProcessor,
    pdf_processor: PdfProcessor,
    office_converter: OfficeConverter,
}

impl FileConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            image_processor: ImageProcessor::with_settings(EncodeSettings {
                jpeg_quality: config.jpeg_quality,
            }),
            pdf_processor: PdfProcessor::new(),
            office_converter: OfficeConverter::new(config.office_binary.clone()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `<output_dir>/<input stem>.<lower-cased format token>`. Never looks at the filesystem.
    pub fn output_path_for(&self, input: &Path, output_format: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        self.output_dir
            .join(format!("{}.{}", stem, output_format.to_lowercase()))
    }

    /// Convert one file, dispatching on the input's conversion family.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConvertedFile, ConversionError> {
        let input = request.input_path();
        let output_format = request.output_format();

        let family = classify(input);
        if family == ConversionFamily::Unsupported {
            return Err(unsupported_input(input));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let output = self.output_path_for(input, output_format);

        log::info!(
            "Converting {} ({}) to {} -> {}",
            input.display(),
            family,
            output_format,
            output.display()
        );

        match family {
            ConversionFamily::Image => self.image_processor.convert(input, &output, output_format)?,
            ConversionFamily::TextLike => self.convert_text(input, &output, output_format)?,
            ConversionFamily::Pdf => self.convert_pdf(input, &output, output_format)?,
            ConversionFamily::Unsupported => return Err(unsupported_input(input)),
        }

        Ok(ConvertedFile {
            input_path: input.to_path_buf(),
            output_path: output,
            format: output_format.to_string(),
        })
    }

    /// Like [`FileConverter::convert`], but folds the result into a user-facing outcome.
    pub fn run(&self, request: &ConversionRequest) -> ConversionOutcome {
        let result = self.convert(request);
        match &result {
            Ok(converted) => log::info!(
                "✅ Conversion successful: {} -> {}",
                converted.input_path.display(),
                converted.output_path.display()
            ),
            Err(e) => log::warn!(
                "❌ Failed to convert {} to {}: {}",
                request.input_path().display(),
                request.output_format(),
                e
            ),
        }
        ConversionOutcome::from_result(request.input_path(), result)
    }

    /// Plain text or legacy Word to PDF. PDF is the only accepted target.
    pub fn convert_text(
        &self,
        input: &Path,
        output: &Path,
        output_format: &str,
    ) -> Result<(), ConversionError> {
        if OutputFormat::parse(output_format) != Some(OutputFormat::Pdf) {
            return Err(ConversionError::UnsupportedOutputFormat {
                format: output_format.to_string(),
                family: ConversionFamily::TextLike,
            });
        }

        match classifier::extension(input).as_deref() {
            Some("txt") => {
                let bytes = std::fs::read(input)?;
                let text = String::from_utf8_lossy(&bytes);
                let pdf_bytes = self.pdf_processor.render_text_pdf(&text);
                std::fs::write(output, pdf_bytes)?;
                Ok(())
            }
            Some("doc") => {
                let out_dir = output.parent().unwrap_or(self.output_dir.as_path());
                self.office_converter.convert_to_pdf(input, out_dir)?;
                Ok(())
            }
            _ => Err(unsupported_input(input)),
        }
    }

    /// PDF to "DOC": the extracted text, written as UTF-8.
    pub fn convert_pdf(
        &self,
        input: &Path,
        output: &Path,
        output_format: &str,
    ) -> Result<(), ConversionError> {
        if OutputFormat::parse(output_format) != Some(OutputFormat::LegacyText) {
            return Err(ConversionError::UnsupportedOutputFormat {
                format: output_format.to_string(),
                family: ConversionFamily::Pdf,
            });
        }

        let text = self.pdf_processor.extract_text(input)?;
        std::fs::write(output, text.as_bytes())?;
        Ok(())
    }
}

fn unsupported_input(input: &Path) -> ConversionError {
    ConversionError::UnsupportedInputFormat {
        path: input.to_path_buf(),
    }
}

impl Default for FileConverter {
    fn default() -> Self {
        Self::new(&ConverterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf_processor::write_pages;
    use tempfile::TempDir;

    fn converter_in(dir: &TempDir) -> FileConverter {
        let config = ConverterConfig::default()
            .with_output_dir(dir.path().join("output_files"))
            .with_office_binary("definitely-not-an-office-suite");
        FileConverter::new(&config)
    }

    #[test]
    fn output_path_is_derived_from_stem_and_lowercased_format() {
        let converter = FileConverter::default();
        assert_eq!(
            converter.output_path_for(Path::new("/home/me/report.txt"), "PDF"),
            PathBuf::from("output_files/report.pdf")
        );
        assert_eq!(
            converter.output_path_for(Path::new("photo.gif"), "Jpeg"),
            PathBuf::from("output_files/photo.jpeg")
        );
        assert_eq!(
            converter.output_path_for(Path::new("archive.tar.pdf"), "DOC"),
            PathBuf::from("output_files/archive.tar.doc")
        );
        assert_eq!(
            converter.output_path_for(Path::new("photo.gif"), "Jpeg"),
            converter.output_path_for(Path::new("photo.gif"), "Jpeg")
        );
    }

    #[test]
    fn text_file_becomes_single_page_pdf() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("report.txt");
        std::fs::write(&input, "Hello from the report").unwrap();

        let converter = converter_in(&dir);
        let request = ConversionRequest::new(&input, "pdf").unwrap();
        let converted = converter.convert(&request).unwrap();

        assert_eq!(converted.output_path, dir.path().join("output_files/report.pdf"));
        let bytes = std::fs::read(&converted.output_path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
        assert!(doc.extract_text(&[1]).unwrap().contains("Hello from the report"));
    }

    #[test]
    fn pdf_becomes_doc_named_text() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("scan.pdf");
        std::fs::write(&input, write_pages(&["Hello", "World"])).unwrap();

        let converter = converter_in(&dir);
        let request = ConversionRequest::new(&input, "DOC").unwrap();
        let converted = converter.convert(&request).unwrap();

        assert_eq!(converted.output_path, dir.path().join("output_files/scan.doc"));
        let text = std::fs::read_to_string(&converted.output_path).unwrap();
        assert_eq!(text, PdfProcessor::new().extract_text(&input).unwrap());
        assert_eq!(text.split_whitespace().collect::<String>(), "HelloWorld");
    }

    #[test]
    fn unsupported_input_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("data.xyz");

        let converter = converter_in(&dir);
        let request = ConversionRequest::new(&input, "PDF").unwrap();
        let err = converter.convert(&request).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedInputFormat);
        assert!(!converter.output_dir().exists());
    }

    #[test]
    fn wrong_target_for_family_is_unsupported_output() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "notes").unwrap();
        let pdf = dir.path().join("scan.pdf");
        std::fs::write(&pdf, write_pages(&["x"])).unwrap();

        let converter = converter_in(&dir);
        for (input, token) in [(&txt, "DOC"), (&txt, "PNG"), (&pdf, "PDF"), (&pdf, "TXT")] {
            let request = ConversionRequest::new(input, token).unwrap();
            let err = converter.convert(&request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedOutputFormat, "{} {}", input.display(), token);
            assert!(!converter.output_path_for(input, token).exists());
        }
    }

    #[test]
    fn padded_format_token_is_rejected_without_writing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("report.txt");
        std::fs::write(&input, "padded").unwrap();

        let converter = converter_in(&dir);
        for token in [" PDF ", "PDF ", "\tpdf"] {
            let request = ConversionRequest::new(&input, token).unwrap();
            let err = converter.convert(&request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedOutputFormat, "{:?}", token);
        }

        let written: Vec<_> = std::fs::read_dir(converter.output_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert!(written.is_empty(), "{:?}", written);
    }

    #[test]
    fn jpeg_quality_comes_from_config() {
        use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

        let dir = TempDir::new().unwrap();
        let mut img = RgbImage::new(64, 64);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
        }
        let input = dir.path().join("gradient.png");
        DynamicImage::ImageRgb8(img)
            .save_with_format(&input, ImageFormat::Png)
            .unwrap();

        let size_at = |quality: u8| {
            let config = ConverterConfig::default()
                .with_output_dir(dir.path().join(format!("q{}", quality)))
                .with_jpeg_quality(quality);
            let converted = FileConverter::new(&config)
                .convert(&ConversionRequest::new(&input, "JPEG").unwrap())
                .unwrap();
            std::fs::metadata(converted.output_path).unwrap().len()
        };

        assert!(size_at(10) < size_at(95));
    }

    #[cfg(unix)]
    #[test]
    fn legacy_doc_lands_at_derived_output_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        // Stands in for soffice: `--headless --convert-to pdf --outdir <dir> <input>`.
        let office = dir.path().join("fake-soffice");
        std::fs::write(
            &office,
            "#!/bin/sh\nname=$(basename \"$6\")\nprintf '%%PDF-1.4\\n' > \"$5/${name%.*}.pdf\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&office, std::fs::Permissions::from_mode(0o755)).unwrap();

        let input = dir.path().join("letter.doc");
        std::fs::write(&input, b"\xd0\xcf\x11\xe0").unwrap();

        let config = ConverterConfig::default()
            .with_output_dir(dir.path().join("output_files"))
            .with_office_binary(office.to_str().unwrap());
        let converter = FileConverter::new(&config);
        let request = ConversionRequest::new(&input, "PDF").unwrap();

        // A freshly written script can briefly be busy if another test forks meanwhile.
        let mut result = converter.convert(&request);
        for _ in 0..5 {
            match &result {
                Err(e) if e.to_string().contains("busy") => {
                    std::thread::sleep(std::time::Duration::from_millis(50));
                    result = converter.convert(&request);
                }
                _ => break,
            }
        }
        let converted = result.unwrap();

        assert_eq!(converted.output_path, dir.path().join("output_files/letter.pdf"));
        let bytes = std::fs::read(&converted.output_path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn text_converter_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let converter = converter_in(&dir);
        let err = converter
            .convert_text(
                &dir.path().join("letter.docx"),
                &dir.path().join("letter.pdf"),
                "PDF",
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedInputFormat);
    }

    #[test]
    fn legacy_doc_failure_is_passed_through() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("letter.doc");
        std::fs::write(&input, b"\xd0\xcf\x11\xe0").unwrap();

        let converter = converter_in(&dir);
        let request = ConversionRequest::new(&input, "PDF").unwrap();
        let outcome = converter.run(&request);

        match outcome {
            ConversionOutcome::Failure { kind, message } => {
                assert_eq!(kind, ErrorKind::ConversionFailed);
                assert!(message.starts_with("Error converting"), "{}", message);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn missing_input_is_conversion_failed() {
        let dir = TempDir::new().unwrap();
        let converter = converter_in(&dir);
        let request = ConversionRequest::new(dir.path().join("ghost.png"), "BMP").unwrap();

        let err = converter.convert(&request).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConversionFailed);
    }

    #[test]
    fn run_reports_success_message() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("hello.txt");
        std::fs::write(&input, "hi").unwrap();

        let converter = converter_in(&dir);
        let outcome = converter.run(&ConversionRequest::new(&input, "PDF").unwrap());

        assert!(outcome.is_success());
        if let ConversionOutcome::Success { message, output_path } = outcome {
            assert!(message.starts_with("Conversion successful: "));
            assert!(output_path.ends_with("hello.pdf"));
        }
    }
}
