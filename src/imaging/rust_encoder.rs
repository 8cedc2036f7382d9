//! Pure Rust QR encoder: `qrcode` for the symbol, `image` for the PNG.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Symbol encoding (version, mask, ECC) | `qrcode::QrCode::with_error_correction_level` |
//! | Rasterize with margin + exact width | [`Raster`](super::calculations::Raster) + `image::GrayImage::from_fn` |
//! | Encode → PNG | `image::DynamicImage::write_to` with `ImageFormat::Png` |
//! | Commit | [`write_atomic`](crate::files::write_atomic) |

use super::calculations::Raster;
use super::encoder::{EncodeError, QrEncoder};
use super::params::{EncodeParams, ErrorCorrection, QrOptions};
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use std::io::Cursor;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Pure Rust encoder writing grayscale PNGs.
pub struct RustEncoder;

impl RustEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `data` as a square grayscale image.
pub fn render(data: &str, options: &QrOptions) -> Result<GrayImage, EncodeError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), options.error_correction.into())
        .map_err(|e| EncodeError::Data(format!("{e} ({} bytes)", data.len())))?;
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let raster = Raster::new(modules, options.margin, options.width);

    Ok(GrayImage::from_fn(raster.width, raster.width, |x, y| {
        match (raster.module_at(x), raster.module_at(y)) {
            (Some(mx), Some(my)) if colors[(my * modules + mx) as usize] == Color::Dark => DARK,
            _ => LIGHT,
        }
    }))
}

/// Encode an image as PNG bytes.
fn png_bytes(img: GrayImage) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

impl QrEncoder for RustEncoder {
    fn encode(&self, params: &EncodeParams) -> Result<(), EncodeError> {
        let img = render(&params.data, &params.options)?;
        let bytes = png_bytes(img)?;
        crate::files::write_atomic(&params.output, &bytes)?;
        Ok(())
    }
}
