//! Extension-based classification of input files.

use crate::types::ConversionFamily;
use std::path::Path;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png", "gif", "bmp"];
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "doc"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// Lower-cased text after the last `.` of the file name, if there is one.
///
/// Unlike [`Path::extension`] this also matches a bare dotfile name such as
/// `.pdf`, so a name is classified purely by its suffix.
pub fn extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Decide which converter handles `path`. Looks at the extension only, never the file.
pub fn classify(path: &Path) -> ConversionFamily {
    let Some(ext) = extension(path) else {
        return ConversionFamily::Unsupported;
    };

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        ConversionFamily::Image
    } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        ConversionFamily::TextLike
    } else if PDF_EXTENSIONS.contains(&ext.as_str()) {
        ConversionFamily::Pdf
    } else {
        ConversionFamily::Unsupported
    }
}
