//! Finding still images to scan on disk.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the still-image sources will try to decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Discover all supported image files at a path.
///
/// If path is a file, returns it if supported.
/// If path is a directory, recursively finds all supported files, sorted by path.
pub fn discover_images(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if is_supported(path) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file() && is_supported(p))
        .collect();

    // Sort by path for deterministic ordering
    files.sort();
    files
}

/// Check if a file has a supported extension (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.iter().any(|fmt| *fmt == ext_lower)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("shelf.jpg")));
        assert!(is_supported(Path::new("shelf.JPG")));
        assert!(is_supported(Path::new("shelf.png")));
        assert!(is_supported(Path::new("shelf.tiff")));
        assert!(!is_supported(Path::new("shelf.txt")));
        assert!(!is_supported(Path::new("shelf")));
    }

    #[test]
    fn test_discover_directory_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.bmp"), b"x").unwrap();

        let found = discover_images(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.jpg"),
                PathBuf::from("b.png"),
                PathBuf::from("nested").join("c.bmp"),
            ]
        );
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("cover.jpeg");
        let text = dir.path().join("cover.txt");
        std::fs::write(&image, b"x").unwrap();
        std::fs::write(&text, b"x").unwrap();

        assert_eq!(discover_images(&image), vec![image.clone()]);
        assert!(discover_images(&text).is_empty());
    }
}
