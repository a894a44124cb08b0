//! Frames from image files on disk.

use image::DynamicImage;
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::error::CameraError;
use crate::pipeline::discover_images;

/// A still-image frame source.
///
/// A single file is re-read on every capture. A directory serves its supported
/// images once each, in sorted order, then reports a read failure. Preview
/// reads show the image the next capture will return.
pub struct StillSource {
    root: PathBuf,
    files: Vec<PathBuf>,
    next: usize,
    repeat: bool,
}

impl StillSource {
    pub fn open(path: &Path) -> Result<Self, CameraError> {
        let still_error = |message: &str| CameraError::Still {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        if !path.exists() {
            return Err(still_error("no such file or directory"));
        }

        let files = discover_images(path);
        if files.is_empty() {
            return Err(still_error("no supported images"));
        }

        Ok(Self {
            root: path.to_path_buf(),
            repeat: path.is_file(),
            files,
            next: 0,
        })
    }

    fn current(&self) -> Result<PathBuf, CameraError> {
        self.files
            .get(self.next)
            .cloned()
            .ok_or_else(|| CameraError::ReadFailed {
                message: format!("no more images in {}", self.root.display()),
            })
    }

    /// Images not yet served (always 1 for a single file).
    pub fn remaining(&self) -> usize {
        if self.repeat {
            1
        } else {
            self.files.len() - self.next
        }
    }
}

impl FrameSource for StillSource {
    fn describe(&self) -> String {
        format!("still images at {}", self.root.display())
    }

    fn read_frame(&mut self) -> Result<DynamicImage, CameraError> {
        let path = self.current()?;
        if !self.repeat {
            self.next += 1;
        }

        load_frame(&path)
    }

    fn preview_frame(&mut self) -> Result<DynamicImage, CameraError> {
        load_frame(&self.current()?)
    }
}

/// Decode one image file into a frame.
pub fn load_frame(path: &Path) -> Result<DynamicImage, CameraError> {
    tracing::debug!("Reading still frame {:?}", path);
    image::open(path).map_err(|e| CameraError::Still {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
