//! QR image generation in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Encode symbol** | `qrcode` (matrix only, no renderer features) |
//! | **Rasterize** | [`calculations::Raster`] pixel → module mapping |
//! | **Write PNG** | `image` crate PNG encoder + atomic rename |
//!
//! The module is split into:
//! - **Calculations**: Pure raster math (unit testable)
//! - **Parameters**: Data structures describing an encode
//! - **Encoder**: [`QrEncoder`] trait + [`RustEncoder`]

mod calculations;
pub mod encoder;
mod params;
pub mod rust_encoder;

pub use encoder::{EncodeError, QrEncoder};
pub use params::{EncodeParams, ErrorCorrection, QrOptions};
pub use rust_encoder::RustEncoder;
