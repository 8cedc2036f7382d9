//! Parameter types for QR encoding.
//!
//! These structs describe *what* to encode, not *how*. They are the interface
//! between the manifest builder (which decides which images to create) and
//! the [`encoder`](super::encoder) (which does the pixel work), so a mock
//! encoder can stand in during tests.
//!
//! ## Types
//!
//! - [`ErrorCorrection`]: QR error-correction level (`L`, `M`, `Q`, `H`).
//! - [`QrOptions`]: visual fidelity settings shared by every image of a build.
//! - [`EncodeParams`]: one image: payload, output path, options.

use crate::config::QrConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Error-correction level: how much of the symbol may be damaged and still
/// decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    #[serde(rename = "L")]
    Low,
    /// ~15% recovery.
    #[default]
    #[serde(rename = "M")]
    Medium,
    /// ~25% recovery.
    #[serde(rename = "Q")]
    Quartile,
    /// ~30% recovery.
    #[serde(rename = "H")]
    High,
}

/// Rendering options applied uniformly to every image in one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrOptions {
    pub error_correction: ErrorCorrection,
    /// Quiet zone in modules.
    pub margin: u32,
    /// Target image width in pixels.
    pub width: u32,
}

impl QrOptions {
    pub fn from_config(config: &QrConfig) -> Self {
        Self {
            error_correction: config.error_correction,
            margin: config.margin,
            width: config.width,
        }
    }
}

impl Default for QrOptions {
    fn default() -> Self {
        Self::from_config(&QrConfig::default())
    }
}

/// Parameters for encoding a single QR image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    /// Payload, normally the absolute page URL.
    pub data: String,
    pub output: PathBuf,
    pub options: QrOptions,
}
