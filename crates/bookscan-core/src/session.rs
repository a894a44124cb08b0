//! An interactive scanning session: camera, catalog, debounced scan worker.

use image::DynamicImage;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::camera::{CameraHandle, PreviewWorker};
use crate::catalog::Catalog;
use crate::config::{CameraConfig, Config};
use crate::error::{CameraError, ExportError};
use crate::export::{self, ExportFormat, ExportSummary};
use crate::pipeline::ScanPipeline;
use crate::types::{CatalogEntry, CatalogStats, ScanReport};

const EVENT_BUFFER: usize = 16;

#[derive(Debug, Default)]
struct GateState {
    in_flight: bool,
    last_accepted: Option<Instant>,
}

/// Debounce for scan requests.
///
/// A request is accepted only when no scan is in flight and the cooldown since
/// the last accepted request has elapsed. Rejected requests are dropped.
#[derive(Debug, Clone)]
pub struct ScanGate {
    cooldown: Duration,
    state: Arc<Mutex<GateState>>,
}

impl ScanGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: Arc::new(Mutex::new(GateState::default())),
        }
    }

    pub fn try_acquire(&self) -> Option<ScanPermit> {
        self.try_acquire_at(Instant::now())
    }

    /// Acquire as of `now`.
    pub fn try_acquire_at(&self, now: Instant) -> Option<ScanPermit> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if state.in_flight {
            tracing::debug!("Scan request ignored: scan in progress");
            return None;
        }
        if let Some(last) = state.last_accepted {
            if now.saturating_duration_since(last) < self.cooldown {
                tracing::debug!("Scan request ignored: cooling down");
                return None;
            }
        }

        state.in_flight = true;
        state.last_accepted = Some(now);
        Some(ScanPermit {
            state: self.state.clone(),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).in_flight
    }
}

/// Held by the running scan; clears the in-flight flag when dropped.
#[derive(Debug)]
pub struct ScanPermit {
    state: Arc<Mutex<GateState>>,
}

impl Drop for ScanPermit {
    fn drop(&mut self) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).in_flight = false;
    }
}

/// Delivered to the presentation layer when a requested scan finishes.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    Completed(ScanReport),
    /// The frame could not be captured
    Failed(String),
}

/// Owns the catalog and coordinates captures, scans, preview, and export.
pub struct ScanSession {
    pipeline: ScanPipeline,
    catalog: Arc<tokio::sync::Mutex<Catalog>>,
    gate: ScanGate,
    camera: Option<CameraHandle>,
    camera_config: CameraConfig,
    preview: Option<PreviewWorker>,
    events: mpsc::Sender<ScanEvent>,
}

impl ScanSession {
    /// Create a session and the receiver its scan events arrive on.
    pub fn new(pipeline: ScanPipeline, config: &Config) -> (Self, mpsc::Receiver<ScanEvent>) {
        let (events, rx) = mpsc::channel(EVENT_BUFFER);
        let session = Self {
            pipeline,
            catalog: Arc::new(tokio::sync::Mutex::new(Catalog::new())),
            gate: ScanGate::new(Duration::from_millis(config.scan.cooldown_ms)),
            camera: None,
            camera_config: config.camera.clone(),
            preview: None,
            events,
        };
        (session, rx)
    }

    /// Attach a camera, replacing (and stopping the preview of) any previous one.
    pub fn attach_camera(&mut self, camera: CameraHandle) {
        self.stop_preview();
        tracing::info!("Using {}", camera.description());
        self.camera = Some(camera);
    }

    pub fn camera(&self) -> Option<&CameraHandle> {
        self.camera.as_ref()
    }

    pub fn gate(&self) -> &ScanGate {
        &self.gate
    }

    /// Start the preview worker on the attached camera.
    pub fn start_preview(&mut self) -> Result<(), CameraError> {
        if self.preview.is_some() {
            return Ok(());
        }
        let camera = self.camera.clone().ok_or(CameraError::NotStarted)?;
        self.preview = Some(PreviewWorker::spawn(camera, &self.camera_config)?);
        Ok(())
    }

    pub fn stop_preview(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            preview.stop();
        }
    }

    pub fn preview(&self) -> Option<&PreviewWorker> {
        self.preview.as_ref()
    }

    /// Request a scan of the next camera frame.
    ///
    /// Returns `Ok(false)` when the request was debounced. An accepted request
    /// reports back through a [`ScanEvent`].
    pub fn request_scan(&self) -> Result<bool, CameraError> {
        let camera = self.camera.clone().ok_or(CameraError::NotStarted)?;
        let Some(permit) = self.gate.try_acquire() else {
            return Ok(false);
        };

        let pipeline = self.pipeline.clone();
        let catalog = self.catalog.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let event = match camera.capture().await {
                Ok(frame) => {
                    let mut catalog = catalog.lock().await;
                    ScanEvent::Completed(pipeline.process(frame, &mut catalog).await)
                }
                Err(e) => {
                    tracing::error!("Failed to capture frame: {e}");
                    ScanEvent::Failed(e.to_string())
                }
            };
            drop(permit);

            if events.send(event).await.is_err() {
                tracing::debug!("Scan event dropped: receiver closed");
            }
        });

        Ok(true)
    }

    /// Scan a frame directly, bypassing the debounce.
    pub async fn scan_frame(&self, frame: DynamicImage) -> ScanReport {
        let mut catalog = self.catalog.lock().await;
        self.pipeline.process(frame, &mut catalog).await
    }

    /// Copy of all entries in insertion order.
    pub async fn entries(&self) -> Vec<CatalogEntry> {
        self.catalog.lock().await.entries().to_vec()
    }

    pub async fn stats(&self) -> CatalogStats {
        self.catalog.lock().await.stats()
    }

    pub async fn clear(&self) {
        self.catalog.lock().await.clear();
        tracing::info!("Catalog cleared");
    }

    /// Write the catalog; it is left untouched whether or not this succeeds.
    pub async fn export(
        &self,
        path: &Path,
        format: ExportFormat,
    ) -> Result<ExportSummary, ExportError> {
        let catalog = self.catalog.lock().await;
        export::export(catalog.entries(), path, format)
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop_preview();
    }
}
