// src/exec/decode.rs

//! Text decoding for child output.
//!
//! Labels follow the WHATWG encoding names (`utf-8`, `latin1`,
//! `windows-1251`, `shift_jis`, ...). Unknown labels fall back to UTF-8.

use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use tracing::warn;

/// A resolved output encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    pub fn utf8() -> Self {
        Self(UTF_8)
    }

    /// Resolve a label, or `None` if it names no known encoding.
    pub fn lookup(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(Self)
    }

    /// Resolve a label, falling back to UTF-8 when it is unknown.
    pub fn for_label(label: &str) -> Self {
        Self::lookup(label).unwrap_or_else(|| {
            warn!(encoding = %label, "unknown output encoding; falling back to utf-8");
            Self::utf8()
        })
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decode a complete buffer in one go.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, _had_errors) = self.0.decode_with_bom_removal(bytes);
        text.into_owned()
    }

    /// Start an incremental decode.
    pub fn decoder(&self) -> StreamDecoder {
        StreamDecoder {
            inner: self.0.new_decoder_with_bom_removal(),
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl std::fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

/// Stateful decoder for output that arrives in arbitrary chunks.
///
/// Bytes of a multi-byte sequence split across chunk boundaries are held
/// back until the rest of the sequence arrives.
pub struct StreamDecoder {
    inner: Decoder,
}

impl StreamDecoder {
    /// Decode the next chunk. May return an empty string if the chunk only
    /// contained the start of a character.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.decode(chunk, false)
    }

    /// Flush whatever is still buffered. Incomplete trailing sequences
    /// become U+FFFD.
    pub fn finish(&mut self) -> String {
        self.decode(&[], true)
    }

    fn decode(&mut self, mut input: &[u8], last: bool) -> String {
        let mut out = String::new();
        loop {
            let needed = self
                .inner
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len() + 16);
            out.reserve(needed);
            let (result, read, _replaced) = self.inner.decode_to_string(input, &mut out, last);
            input = &input[read..];
            match result {
                CoderResult::InputEmpty => return out,
                CoderResult::OutputFull => continue,
            }
        }
    }
}

impl std::fmt::Debug for StreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("encoding", &self.inner.encoding().name())
            .finish()
    }
}
