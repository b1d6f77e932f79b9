//! Trait-based image dimension lookup.

use std::path::Path;

use crate::error::{LabelError, Result};

/// Reports the pixel size of an image file.
pub trait ImageSource {
    /// Width and height of the image at `path`, in pixels.
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;
}

/// Reads image headers from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskImages;

impl ImageSource for DiskImages {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        image::image_dimensions(path).map_err(|source| LabelError::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Sizes known up front, keyed by filename, with a fallback for the rest.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct FixedDimensions {
    default: (u32, u32),
    overrides: std::collections::HashMap<String, (u32, u32)>,
}

#[cfg(test)]
impl FixedDimensions {
    /// Every image reports `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            default: (width, height),
            overrides: std::collections::HashMap::new(),
        }
    }

    /// Report a different size for one filename.
    pub fn with_image(mut self, name: &str, width: u32, height: u32) -> Self {
        self.overrides.insert(name.to_string(), (width, height));
        self
    }
}

#[cfg(test)]
impl ImageSource for FixedDimensions {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        Ok(self.overrides.get(name).copied().unwrap_or(self.default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_images_reads_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        image::RgbImage::new(32, 24).save(&path).unwrap();

        assert_eq!(DiskImages.dimensions(&path).unwrap(), (32, 24));
    }

    #[test]
    fn test_disk_images_reports_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = DiskImages.dimensions(&path).unwrap_err();
        assert!(matches!(err, LabelError::Image { .. }));
    }

    #[test]
    fn test_fixed_dimensions_override() {
        let source = FixedDimensions::new(800, 600).with_image("tall.png", 300, 900);
        assert_eq!(source.dimensions(Path::new("/x/a.png")).unwrap(), (800, 600));
        assert_eq!(source.dimensions(Path::new("/x/tall.png")).unwrap(), (300, 900));
    }
}
