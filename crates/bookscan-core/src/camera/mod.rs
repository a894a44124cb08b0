//! Frame sources: live cameras, still images, and the preview worker.

#[cfg(feature = "native-camera")]
mod native;
mod preview;
mod still;

#[cfg(feature = "native-camera")]
pub use native::NativeCamera;
pub use preview::PreviewWorker;
pub use still::{load_frame, StillSource};

use image::DynamicImage;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::config::CameraConfig;
use crate::error::CameraError;

/// Anything that can hand out full-resolution frames on demand.
pub trait FrameSource: Send {
    /// Human-readable name for status lines.
    fn describe(&self) -> String;

    /// Block until the next frame is available.
    fn read_frame(&mut self) -> Result<DynamicImage, CameraError>;

    /// A frame for display only. Sources that serve a finite sequence must not
    /// advance it here.
    fn preview_frame(&mut self) -> Result<DynamicImage, CameraError> {
        self.read_frame()
    }
}

/// Opens the device at a given index.
pub type DeviceOpener<'a> = dyn FnMut(u32) -> Result<Box<dyn FrameSource>, CameraError> + 'a;

/// Shared, lock-protected access to one frame source.
///
/// Cloned into the preview worker and each scan capture; reads are serialized.
#[derive(Clone)]
pub struct CameraHandle {
    index: Option<u32>,
    description: String,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
}

impl CameraHandle {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            index: None,
            description: source.describe(),
            source: Arc::new(Mutex::new(source)),
        }
    }

    /// Handle for a probed device index.
    pub fn with_index(index: u32, source: Box<dyn FrameSource>) -> Self {
        Self {
            index: Some(index),
            ..Self::new(source)
        }
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Read one frame on the calling thread.
    pub fn read_frame(&self) -> Result<DynamicImage, CameraError> {
        let mut source = self.source.lock().map_err(|_| CameraError::ReadFailed {
            message: "camera lock poisoned".to_string(),
        })?;
        source.read_frame()
    }

    /// Read a preview frame without consuming a capture.
    pub fn preview_frame(&self) -> Result<DynamicImage, CameraError> {
        let mut source = self.source.lock().map_err(|_| CameraError::ReadFailed {
            message: "camera lock poisoned".to_string(),
        })?;
        source.preview_frame()
    }

    /// Read one frame on the blocking pool.
    pub async fn capture(&self) -> Result<DynamicImage, CameraError> {
        let handle = self.clone();
        tokio::task::spawn_blocking(move || handle.read_frame())
            .await
            .map_err(|e| CameraError::ReadFailed {
                message: format!("capture task failed: {e}"),
            })?
    }
}

impl std::fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraHandle")
            .field("index", &self.index)
            .field("description", &self.description)
            .finish()
    }
}

/// Outcome of probing one device index.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceProbe {
    pub index: u32,
    /// Device description when a frame was read
    pub description: Option<String>,
    /// Why the index was rejected
    pub error: Option<String>,
}

impl DeviceProbe {
    pub fn is_usable(&self) -> bool {
        self.description.is_some()
    }
}

/// Try one index: it must open and yield a frame.
fn probe_one(
    index: u32,
    opener: &mut DeviceOpener<'_>,
) -> Result<Box<dyn FrameSource>, CameraError> {
    let mut source = opener(index)?;
    source.read_frame()?;
    Ok(source)
}

/// Return the first device in `0..max_index` that opens and yields a frame.
pub fn probe_devices(
    max_index: u32,
    opener: &mut DeviceOpener<'_>,
) -> Result<(u32, Box<dyn FrameSource>), CameraError> {
    for index in 0..max_index {
        match probe_one(index, opener) {
            Ok(source) => {
                tracing::info!("Camera found at index {}: {}", index, source.describe());
                return Ok((index, source));
            }
            Err(e) => tracing::debug!("Device {index} rejected: {e}"),
        }
    }
    Err(CameraError::NotFound { probed: max_index })
}

/// Probe every index in `0..max_index` and report each result.
pub fn list_devices(max_index: u32, opener: &mut DeviceOpener<'_>) -> Vec<DeviceProbe> {
    (0..max_index)
        .map(|index| match probe_one(index, opener) {
            Ok(source) => DeviceProbe {
                index,
                description: Some(source.describe()),
                error: None,
            },
            Err(e) => DeviceProbe {
                index,
                description: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Opener for live devices at the configured resolution.
pub fn native_opener(config: &CameraConfig) -> Box<DeviceOpener<'static>> {
    #[cfg(feature = "native-camera")]
    {
        let config = config.clone();
        Box::new(move |index| {
            NativeCamera::open(index, &config).map(|c| Box::new(c) as Box<dyn FrameSource>)
        })
    }
    #[cfg(not(feature = "native-camera"))]
    {
        let _ = config;
        Box::new(|_| Err(CameraError::Unavailable))
    }
}

/// Probe live devices and wrap the first working one.
pub fn open_camera(config: &CameraConfig) -> Result<CameraHandle, CameraError> {
    if !cfg!(feature = "native-camera") {
        return Err(CameraError::Unavailable);
    }
    let mut opener = native_opener(config);
    let (index, source) = probe_devices(config.max_probe_index, opener.as_mut())?;
    Ok(CameraHandle::with_index(index, source))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves solid frames; fails every read when `broken`.
    pub(crate) struct FakeCamera {
        pub name: String,
        pub broken: bool,
        pub reads: Arc<AtomicU32>,
    }

    impl FakeCamera {
        pub(crate) fn working(name: &str) -> Self {
            Self {
                name: name.to_string(),
                broken: false,
                reads: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    impl FrameSource for FakeCamera {
        fn describe(&self) -> String {
            self.name.clone()
        }

        fn read_frame(&mut self) -> Result<DynamicImage, CameraError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(CameraError::ReadFailed {
                    message: "no signal".to_string(),
                });
            }
            Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
                1920,
                1080,
                Rgb([200, 200, 200]),
            )))
        }
    }

    fn opener_with(
        plan: Vec<Option<bool>>,
    ) -> impl FnMut(u32) -> Result<Box<dyn FrameSource>, CameraError> {
        // None: fails to open. Some(broken): opens, reads fail when broken.
        move |index| match plan.get(index as usize).copied().flatten() {
            None => Err(CameraError::Open {
                index,
                message: "no such device".to_string(),
            }),
            Some(broken) => Ok(Box::new(FakeCamera {
                broken,
                ..FakeCamera::working(&format!("fake{index}"))
            }) as Box<dyn FrameSource>),
        }
    }

    #[test]
    fn test_probe_skips_unreadable_devices() {
        let mut opener = opener_with(vec![None, Some(true), Some(false), Some(false)]);
        let (index, source) = probe_devices(10, &mut opener).unwrap();
        assert_eq!(index, 2);
        assert_eq!(source.describe(), "fake2");
    }

    #[test]
    fn test_probe_none_found() {
        let mut opener = opener_with(vec![None, Some(true)]);
        let err = probe_devices(10, &mut opener).err().unwrap();
        assert!(matches!(err, CameraError::NotFound { probed: 10 }));
        assert!(err.to_string().contains("Please check camera connection"));
    }

    #[test]
    fn test_probe_respects_max_index() {
        let mut opener = opener_with(vec![None, None, Some(false)]);
        assert!(probe_devices(2, &mut opener).is_err());
    }

    #[test]
    fn test_list_devices_reports_each_index() {
        let mut opener = opener_with(vec![None, Some(true), Some(false)]);
        let probes = list_devices(3, &mut opener);
        assert_eq!(probes.len(), 3);
        assert!(!probes[0].is_usable());
        assert!(probes[1].error.as_deref().unwrap().contains("no signal"));
        assert_eq!(probes[2].description.as_deref(), Some("fake2"));
    }

    #[tokio::test]
    async fn test_handle_capture_reads_through_lock() {
        let camera = FakeCamera::working("desk");
        let reads = camera.reads.clone();
        let handle = CameraHandle::with_index(0, Box::new(camera));

        let frame = handle.capture().await.unwrap();
        assert_eq!((frame.width(), frame.height()), (1920, 1080));
        handle.clone().read_frame().unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(handle.description(), "desk");
    }

    #[cfg(not(feature = "native-camera"))]
    #[test]
    fn test_open_camera_unavailable_without_feature() {
        let err = open_camera(&CameraConfig::default()).unwrap_err();
        assert!(matches!(err, CameraError::Unavailable));
    }
}
