//! crates/session/src/capture.rs

use time::OffsetDateTime;

/// Configuration text read from the device.
///
/// Empty text is a legitimate outcome of a session that reached `DONE`; the
/// caller decides that it means there is nothing to archive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaptureResult {
    text: String,
    byte_len: usize,
    captured_at: OffsetDateTime,
}

impl CaptureResult {
    /// Decodes `raw` permissively, replacing malformed UTF-8 sequences.
    #[must_use]
    pub fn from_bytes(raw: &[u8], captured_at: OffsetDateTime) -> Self {
        Self {
            text: String::from_utf8_lossy(raw).into_owned(),
            byte_len: raw.len(),
            captured_at,
        }
    }

    /// Decoded text, line endings untouched.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of raw bytes read from the channel.
    #[must_use]
    pub const fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// When the capture read completed.
    #[must_use]
    pub const fn captured_at(&self) -> OffsetDateTime {
        self.captured_at
    }

    /// Reports whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the result and returns the text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
