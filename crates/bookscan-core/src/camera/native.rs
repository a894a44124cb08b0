//! Live UVC capture through nokhwa.
//!
//! The device is owned by a dedicated thread; reads are request/response over
//! channels so the handle itself is `Send`.

use image::{DynamicImage, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use std::sync::mpsc;
use std::thread::JoinHandle;

use super::FrameSource;
use crate::config::CameraConfig;
use crate::error::CameraError;

type FrameResult = Result<DynamicImage, CameraError>;

pub struct NativeCamera {
    index: u32,
    name: String,
    requests: Option<mpsc::Sender<()>>,
    frames: mpsc::Receiver<FrameResult>,
    thread: Option<JoinHandle<()>>,
}

impl NativeCamera {
    /// Open device `index` at the configured resolution (best-effort).
    pub fn open(index: u32, config: &CameraConfig) -> Result<Self, CameraError> {
        let (request_tx, request_rx) = mpsc::channel::<()>();
        let (frame_tx, frame_rx) = mpsc::channel::<FrameResult>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<String, CameraError>>(1);
        let (width, height) = (config.width, config.height);

        let thread = std::thread::Builder::new()
            .name(format!("bookscan-camera-{index}"))
            .spawn(move || {
                let mut camera = match start(index, width, height) {
                    Ok(camera) => camera,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(camera.info().human_name()));

                while request_rx.recv().is_ok() {
                    if frame_tx.send(grab(&mut camera)).is_err() {
                        break;
                    }
                }
                let _ = camera.stop_stream();
            })
            .map_err(|e| CameraError::Open {
                index,
                message: format!("failed to spawn capture thread: {e}"),
            })?;

        let name = ready_rx.recv().map_err(|_| CameraError::Open {
            index,
            message: "capture thread exited".to_string(),
        })??;

        Ok(Self {
            index,
            name,
            requests: Some(request_tx),
            frames: frame_rx,
            thread: Some(thread),
        })
    }
}

fn start(index: u32, width: u32, height: u32) -> Result<Camera, CameraError> {
    let open_error = |e: nokhwa::NokhwaError| CameraError::Open {
        index,
        message: e.to_string(),
    };

    let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
    ));
    let mut camera = Camera::new(CameraIndex::Index(index), format).map_err(open_error)?;
    camera.open_stream().map_err(open_error)?;
    Ok(camera)
}

fn grab(camera: &mut Camera) -> FrameResult {
    let read_error = |e: nokhwa::NokhwaError| CameraError::ReadFailed {
        message: e.to_string(),
    };

    let buffer = camera.frame().map_err(read_error)?;
    let decoded = buffer.decode_image::<RgbFormat>().map_err(read_error)?;
    let (width, height) = (decoded.width(), decoded.height());

    RgbImage::from_raw(width, height, decoded.into_raw())
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| CameraError::ReadFailed {
            message: format!("frame buffer does not match {width}x{height}"),
        })
}

impl FrameSource for NativeCamera {
    fn describe(&self) -> String {
        format!("{} (device {})", self.name, self.index)
    }

    fn read_frame(&mut self) -> FrameResult {
        let disconnected = || CameraError::ReadFailed {
            message: "capture thread stopped".to_string(),
        };
        let requests = self.requests.as_ref().ok_or_else(disconnected)?;
        requests.send(()).map_err(|_| disconnected())?;
        self.frames.recv().map_err(|_| disconnected())?
    }
}

impl Drop for NativeCamera {
    fn drop(&mut self) {
        // closing the request channel ends the capture loop
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
