//! The `bookscan scan` command: an interactive camera session.

use bookscan_core::camera::{native_opener, open_camera};
use bookscan_core::{CameraHandle, Config, ScanSession, StillSource};
use clap::Args;
use std::path::PathBuf;

use super::interactive;

/// Arguments for the `scan` command.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Use this camera index instead of probing
    #[arg(short, long)]
    pub device: Option<u32>,

    /// Scan still images (a file, or a directory served in order) instead of a camera
    #[arg(long, conflicts_with = "device")]
    pub images: Option<PathBuf>,

    /// Skip Open Library / Google Books lookups
    #[arg(long)]
    pub no_lookup: bool,

    /// Do not run the background preview worker
    #[arg(long)]
    pub no_preview: bool,
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, config: &Config) -> anyhow::Result<()> {
    let pipeline = super::build_pipeline(config, args.no_lookup)?;
    let (mut session, events) = ScanSession::new(pipeline, config);

    let camera = open_source(&args, config).await?;
    session.attach_camera(camera);

    if !args.no_preview {
        if let Err(e) = session.start_preview() {
            tracing::warn!("Preview unavailable: {e}");
        }
    }

    interactive::run(session, events, config).await
}

/// Open the frame source selected by the arguments.
async fn open_source(args: &ScanArgs, config: &Config) -> anyhow::Result<CameraHandle> {
    if let Some(path) = &args.images {
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        return Ok(CameraHandle::new(Box::new(StillSource::open(&path)?)));
    }

    let camera_config = config.camera.clone();
    let device = args.device;

    // probing blocks on driver calls
    let handle = tokio::task::spawn_blocking(move || match device {
        Some(index) => {
            let mut opener = native_opener(&camera_config);
            opener(index).map(|source| CameraHandle::with_index(index, source))
        }
        None => open_camera(&camera_config),
    })
    .await??;

    Ok(handle)
}
