//! Background preview: downscaled frames published at a fixed rate.

use image::DynamicImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use super::CameraHandle;
use crate::config::CameraConfig;
use crate::error::CameraError;

/// A thread that keeps the latest preview frame available.
///
/// Read failures are skipped; the worker keeps polling until stopped.
pub struct PreviewWorker {
    run: Arc<AtomicBool>,
    latest: watch::Receiver<Option<Arc<DynamicImage>>>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    pub fn spawn(camera: CameraHandle, config: &CameraConfig) -> Result<Self, CameraError> {
        let (tx, rx) = watch::channel(None);
        let run = Arc::new(AtomicBool::new(true));
        let run_flag = run.clone();

        let period = Duration::from_millis(1000 / u64::from(config.preview_fps.max(1)));
        let (width, height) = (config.preview_width, config.preview_height);

        let handle = std::thread::Builder::new()
            .name("bookscan-preview".into())
            .spawn(move || {
                let mut failures = 0u32;
                while run_flag.load(Ordering::Relaxed) {
                    let tick = Instant::now();

                    match camera.preview_frame() {
                        Ok(frame) => {
                            failures = 0;
                            let scaled = frame.thumbnail(width, height);
                            if tx.send(Some(Arc::new(scaled))).is_err() {
                                // every receiver is gone
                                break;
                            }
                        }
                        Err(e) => {
                            failures += 1;
                            if failures == 1 {
                                tracing::warn!("Preview frame read failed: {e}");
                            }
                        }
                    }

                    if let Some(rest) = period.checked_sub(tick.elapsed()) {
                        std::thread::sleep(rest);
                    }
                }
                tracing::debug!("Preview worker stopped");
            })
            .map_err(|e| CameraError::ReadFailed {
                message: format!("failed to spawn preview thread: {e}"),
            })?;

        Ok(Self {
            run,
            latest: rx,
            handle: Some(handle),
        })
    }

    /// Most recent preview frame, if one has been captured.
    pub fn latest(&self) -> Option<Arc<DynamicImage>> {
        self.latest.borrow().clone()
    }

    /// A receiver that is notified on every new preview frame.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<DynamicImage>>> {
        self.latest.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.run.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::tests::FakeCamera;

    fn config() -> CameraConfig {
        CameraConfig {
            preview_fps: 100,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_publishes_scaled_frames() {
        let handle = CameraHandle::new(Box::new(FakeCamera::working("desk")));
        let mut worker = PreviewWorker::spawn(handle, &config()).unwrap();

        let mut rx = worker.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .unwrap()
            .unwrap();

        let frame = worker.latest().unwrap();
        // 1920x1080 fit into 400x300 keeps the aspect ratio
        assert_eq!(frame.width(), 400);
        assert!(frame.height() <= 300);

        worker.stop();
        assert!(!worker.is_running());
    }

    #[test]
    fn test_read_failures_do_not_stop_worker() {
        let camera = FakeCamera {
            broken: true,
            ..FakeCamera::working("dead")
        };
        let reads = camera.reads.clone();
        let mut worker =
            PreviewWorker::spawn(CameraHandle::new(Box::new(camera)), &config()).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        assert!(worker.is_running());
        assert!(worker.latest().is_none());
        assert!(reads.load(std::sync::atomic::Ordering::SeqCst) > 1);

        worker.stop();
    }
}
