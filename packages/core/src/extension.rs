//! Allow-list of image extensions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions accepted for classification, compared case-sensitively
pub const ALLOWED_EXTENSIONS: [ImageExtension; 4] = [
    ImageExtension::Jpg,
    ImageExtension::Jpeg,
    ImageExtension::Png,
    ImageExtension::Webp,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageExtension {
    #[serde(rename = ".jpg")]
    Jpg,
    #[serde(rename = ".jpeg")]
    Jpeg,
    #[serde(rename = ".png")]
    Png,
    #[serde(rename = ".webp")]
    Webp,
}

impl ImageExtension {
    /// The extension including its leading dot
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => ".jpg",
            Self::Jpeg => ".jpeg",
            Self::Png => ".png",
            Self::Webp => ".webp",
        }
    }

    /// Content type used when storing an image with this extension
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }

    /// Exact match against the allow-list (`".png"`, not `"png"` or `".PNG"`)
    pub fn parse(ext: &str) -> Option<Self> {
        ALLOWED_EXTENSIONS
            .into_iter()
            .find(|allowed| allowed.as_str() == ext)
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffix of the last path segment starting at its final dot, or "" if there is none
fn object_suffix(file_name: &str) -> &str {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    match name.rfind('.') {
        Some(idx) => &name[idx..],
        None => "",
    }
}

/// Returns the allowed extension of `file_name`, or `None` when the object
/// should not be classified.
pub fn extract_allowed_extension(file_name: &str) -> Option<ImageExtension> {
    ImageExtension::parse(object_suffix(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_extension() {
        assert_eq!(extract_allowed_extension("tmp/a.jpg"), Some(ImageExtension::Jpg));
        assert_eq!(extract_allowed_extension("tmp/a.jpeg"), Some(ImageExtension::Jpeg));
        assert_eq!(extract_allowed_extension("tmp/a.png"), Some(ImageExtension::Png));
        assert_eq!(extract_allowed_extension("tmp/a.webp"), Some(ImageExtension::Webp));
    }

    #[test]
    fn only_the_final_suffix_counts() {
        assert_eq!(extract_allowed_extension("tmp/a.b.png"), Some(ImageExtension::Png));
        assert_eq!(extract_allowed_extension("tmp/a.png.gif"), None);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(extract_allowed_extension("tmp/photo.JPG"), None);
        assert_eq!(extract_allowed_extension("tmp/photo.Png"), None);
    }

    #[test]
    fn rejects_missing_or_unknown_extensions() {
        assert_eq!(extract_allowed_extension("tmp/sample-cat-image.gif"), None);
        assert_eq!(extract_allowed_extension("tmp/no-extension"), None);
        assert_eq!(extract_allowed_extension(""), None);
        assert_eq!(extract_allowed_extension("tmp/"), None);
    }

    #[test]
    fn dots_in_directories_are_ignored() {
        assert_eq!(extract_allowed_extension("tmp.png/photo"), None);
        assert_eq!(extract_allowed_extension("a.jpg/b.webp"), Some(ImageExtension::Webp));
    }

    #[test]
    fn dotfile_name_is_its_own_extension() {
        assert_eq!(extract_allowed_extension("tmp/.png"), Some(ImageExtension::Png));
    }

    #[test]
    fn content_type_defaults_to_jpeg() {
        assert_eq!(ImageExtension::Png.content_type(), "image/png");
        assert_eq!(ImageExtension::Webp.content_type(), "image/webp");
        assert_eq!(ImageExtension::Jpg.content_type(), "image/jpeg");
        assert_eq!(ImageExtension::Jpeg.content_type(), "image/jpeg");
    }

    #[test]
    fn parse_requires_leading_dot() {
        assert_eq!(ImageExtension::parse(".webp"), Some(ImageExtension::Webp));
        assert_eq!(ImageExtension::parse("webp"), None);
    }
}
