//! Image discovery for an annotation directory.

use std::path::Path;

use crate::error::{LabelError, Result};

/// Supported image extensions, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "bmp", "png"];

/// Check if a filename has a supported image extension.
pub fn is_image_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// List image filenames directly inside `dir`, sorted byte-wise.
///
/// Subdirectories are not scanned. Entries whose names are not valid UTF-8
/// are skipped, since filenames are the label store's primary key.
pub fn list_images(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir).map_err(|source| LabelError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| match entry.file_name().into_string() {
            Ok(name) => Some(name),
            Err(raw) => {
                log::warn!("Skipping non UTF-8 filename {:?}", raw);
                None
            }
        })
        .filter(|name| is_image_filename(name))
        .collect();

    names.sort();
    log::debug!("Found {} images in {:?}", names.len(), dir);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching() {
        assert!(is_image_filename("a.png"));
        assert!(is_image_filename("b.JPG"));
        assert!(is_image_filename("c.Jpeg"));
        assert!(is_image_filename("d.bmp"));
        assert!(!is_image_filename("e.tiff"));
        assert!(!is_image_filename("label.sqllite3"));
        assert!(!is_image_filename("png"));
    }

    #[test]
    fn test_list_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.png", "B.jpg", "a.PNG", "notes.txt", "label.sqllite3"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let names = list_images(dir.path()).unwrap();
        assert_eq!(names, vec!["B.jpg", "a.PNG", "c.png"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_images(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LabelError::Scan { .. }));
    }
}
