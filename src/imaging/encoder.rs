//! QR encoder trait and shared error type.
//!
//! The [`QrEncoder`] trait is the one operation the manifest builder needs:
//! turn a payload into an image file at a given path. The production
//! implementation is [`RustEncoder`](super::rust_encoder::RustEncoder);
//! tests substitute a mock that records calls.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot encode payload: {0}")]
    Data(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Trait for QR encoders.
///
/// `Sync` so a single encoder can be shared across rayon workers.
pub trait QrEncoder: Sync {
    /// Encode `params.data` and write the image to `params.output`.
    ///
    /// Implementations must write atomically: on error no file (or the
    /// previous file) remains at `params.output`.
    fn encode(&self, params: &EncodeParams) -> Result<(), EncodeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::QrOptions;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock encoder that records operations and writes a placeholder file.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockEncoder {
        pub operations: Mutex<Vec<RecordedEncode>>,
        /// Payloads that make `encode` fail.
        pub fail_on: Vec<String>,
        /// Per-payload artificial latency, to shuffle completion order.
        pub delays: Vec<(String, Duration)>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedEncode {
        pub data: String,
        pub output: String,
        pub options: QrOptions,
    }

    impl MockEncoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(data: &str) -> Self {
            Self {
                fail_on: vec![data.to_string()],
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedEncode> {
            self.operations.lock().unwrap().clone()
        }

        pub fn encoded_payloads(&self) -> Vec<String> {
            let mut payloads: Vec<String> =
                self.get_operations().into_iter().map(|op| op.data).collect();
            payloads.sort();
            payloads
        }
    }

    impl QrEncoder for MockEncoder {
        fn encode(&self, params: &EncodeParams) -> Result<(), EncodeError> {
            if let Some((_, delay)) = self.delays.iter().find(|(d, _)| *d == params.data) {
                std::thread::sleep(*delay);
            }
            if self.fail_on.contains(&params.data) {
                return Err(EncodeError::Data(format!("mock failure for {}", params.data)));
            }
            self.operations.lock().unwrap().push(RecordedEncode {
                data: params.data.clone(),
                output: params.output.to_string_lossy().to_string(),
                options: params.options,
            });
            crate::files::write_atomic(&params.output, params.data.as_bytes())?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_and_writes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let encoder = MockEncoder::new();
        let output = tmp.path().join("docs_intro.png");

        encoder
            .encode(&EncodeParams {
                data: "https://example.com/docs/intro".into(),
                output: output.clone(),
                options: QrOptions::default(),
            })
            .unwrap();

        let ops = encoder.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].data, "https://example.com/docs/intro");
        assert_eq!(ops[0].options, QrOptions::default());
        assert!(output.exists());
    }

    #[test]
    fn mock_fails_on_request() {
        let tmp = tempfile::TempDir::new().unwrap();
        let encoder = MockEncoder::failing_on("bad");
        let result = encoder.encode(&EncodeParams {
            data: "bad".into(),
            output: tmp.path().join("bad.png"),
            options: QrOptions::default(),
        });
        assert!(matches!(result, Err(EncodeError::Data(_))));
        assert!(encoder.get_operations().is_empty());
        assert!(!tmp.path().join("bad.png").exists());
    }
}
