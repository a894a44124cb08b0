//! Barcode decoding with a blocking worker and timeout.

use image::DynamicImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::ScanConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::DecodedBarcode;

/// Finds every barcode symbol in a still frame.
///
/// Implementations are synchronous and CPU bound; [`FrameDecoder`] moves them
/// onto the blocking pool.
pub trait BarcodeDecoder: Send + Sync {
    /// Decoder name for logging.
    fn name(&self) -> &str;

    /// Decode all symbols, in the order the decoder reports them.
    fn decode(&self, frame: &DynamicImage) -> PipelineResult<Vec<DecodedBarcode>>;
}

/// Runs a [`BarcodeDecoder`] off the async runtime with a time limit.
#[derive(Clone)]
pub struct FrameDecoder {
    decoder: Arc<dyn BarcodeDecoder>,
    timeout_ms: u64,
}

impl FrameDecoder {
    pub fn new(decoder: Arc<dyn BarcodeDecoder>, config: &ScanConfig) -> Self {
        Self {
            decoder,
            timeout_ms: config.decode_timeout_ms,
        }
    }

    pub fn name(&self) -> &str {
        self.decoder.name()
    }

    /// Decode a frame on the blocking pool.
    ///
    /// A decoder panic is reported as a decode error, not propagated.
    pub async fn decode(&self, frame: DynamicImage) -> PipelineResult<Vec<DecodedBarcode>> {
        let decoder = self.decoder.clone();
        let timeout_duration = Duration::from_millis(self.timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || decoder.decode(&frame)).await
        })
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PipelineError::Decode {
                message: format!("Decoder task failed: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                stage: "decode".to_string(),
                timeout_ms: self.timeout_ms,
            }),
        }
    }
}

/// The decoder compiled into this build.
pub fn default_decoder() -> Arc<dyn BarcodeDecoder> {
    #[cfg(feature = "zbar")]
    {
        Arc::new(ZbarDecoder::new())
    }
    #[cfg(not(feature = "zbar"))]
    {
        Arc::new(UnavailableDecoder)
    }
}

/// Normalize a symbol type name: `Ean13` / `EAN-13` / `ean_13` all become `EAN13`.
pub fn symbology_name(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_uppercase()
}

/// ZBar-compatible decoder (EAN/UPC, ISBN, Code 128/39/93, Codabar, DataBar, QR).
#[cfg(feature = "zbar")]
#[derive(Debug, Default)]
pub struct ZbarDecoder;

#[cfg(feature = "zbar")]
impl ZbarDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "zbar")]
impl BarcodeDecoder for ZbarDecoder {
    fn name(&self) -> &str {
        "zbar"
    }

    fn decode(&self, frame: &DynamicImage) -> PipelineResult<Vec<DecodedBarcode>> {
        let gray = frame.to_luma8();
        let (width, height) = gray.dimensions();

        let mut image = zedbar::Image::from_gray(gray.as_raw(), width, height).map_err(|e| {
            PipelineError::Decode {
                message: format!("Cannot prepare {width}x{height} frame: {e:?}"),
            }
        })?;

        let mut scanner = zedbar::Scanner::new();
        let symbols = scanner.scan(&mut image);

        Ok(symbols
            .into_iter()
            .map(|symbol| {
                DecodedBarcode::new(
                    String::from_utf8_lossy(symbol.data()).into_owned(),
                    symbology_name(&format!("{:?}", symbol.symbol_type())),
                )
            })
            .collect())
    }
}

/// Stand-in used when the crate is built without a decoder backend.
#[cfg(not(feature = "zbar"))]
struct UnavailableDecoder;

#[cfg(not(feature = "zbar"))]
impl BarcodeDecoder for UnavailableDecoder {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn decode(&self, _frame: &DynamicImage) -> PipelineResult<Vec<DecodedBarcode>> {
        Err(PipelineError::Decode {
            message: "built without a barcode decoder (enable the `zbar` feature)".to_string(),
        })
    }
}
