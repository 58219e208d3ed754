use crate::types::*;
use image::io::Reader as ImageReader;
use image::{DynamicImage, ImageFormat, ImageOutputFormat};
use std::io::Cursor;
use std::path::Path;

pub struct ImageProcessor {
    encode_settings: EncodeSettings,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self {
            encode_settings: EncodeSettings::default(),
        }
    }

    pub fn with_settings(settings: EncodeSettings) -> Self {
        Self {
            encode_settings: settings,
        }
    }

    /// Re-encode the image at `input` as `output_format` and write it to `output`.
    ///
    /// Only JPEG, PNG, GIF and BMP are accepted; any other token fails before
    /// the input is opened. GIF sources are flattened to RGB for JPEG and
    /// expanded to RGBA for PNG.
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        output_format: &str,
    ) -> Result<(), ConversionError> {
        let target = match OutputFormat::parse(output_format) {
            Some(OutputFormat::Image(target)) => target,
            _ => {
                return Err(ConversionError::UnsupportedOutputFormat {
                    format: output_format.to_string(),
                    family: ConversionFamily::Image,
                })
            }
        };

        let (img, source_format) = self.decode(input)?;
        log::debug!(
            "Decoded {} as {:?} ({}x{}, {:?})",
            input.display(),
            source_format,
            img.width(),
            img.height(),
            img.color()
        );

        let img = apply_compatibility(img, source_format, target);
        let encoded = self.encode(&img, target)?;

        // Encode fully before touching the output so a codec failure leaves nothing behind.
        std::fs::write(output, &encoded)?;

        log::info!(
            "Image converted to {:?}: {} ({} bytes)",
            target,
            output.display(),
            encoded.len()
        );
        Ok(())
    }

    /// Decode an image, detecting its codec from the content rather than the name.
    fn decode(&self, input: &Path) -> Result<(DynamicImage, Option<ImageFormat>), ConversionError> {
        let reader = ImageReader::open(input)?.with_guessed_format()?;
        let source_format = reader.format();
        let img = reader.decode()?;
        Ok((img, source_format))
    }

    fn encode(&self, img: &DynamicImage, target: ImageTarget) -> Result<Vec<u8>, ConversionError> {
        let format = match target {
            ImageTarget::Jpeg => ImageOutputFormat::Jpeg(self.encode_settings.jpeg_quality),
            other => ImageOutputFormat::from(other.image_format()),
        };

        let mut output = Vec::new();
        let mut cursor = Cursor::new(&mut output);
        img.write_to(&mut cursor, format)?;
        Ok(output)
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_compatibility(
    img: DynamicImage,
    source_format: Option<ImageFormat>,
    target: ImageTarget,
) -> DynamicImage {
    match (source_format, target) {
        (Some(ImageFormat::Gif), ImageTarget::Jpeg) => DynamicImage::ImageRgb8(img.to_rgb8()),
        (Some(ImageFormat::Gif), ImageTarget::Png) => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img,
    }
}
