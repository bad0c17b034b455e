//! Encoding-mode tags.
//!
//! Every block's data span starts with a single ASCII tag byte naming how the
//! payload was produced. The tag is stored raw; classification into
//! [`EncodingMode`] is a pure lookup done at read time. Unrecognised bytes
//! classify as [`EncodingMode::Unknown`] and are preserved verbatim — the
//! codec never rejects a container over a tag it does not know.

/// Plain copy — payload stored verbatim.
pub const TAG_PLAIN: u8 = b'N';
/// Zlib-compressed payload.
pub const TAG_ZLIB: u8 = b'Z';
/// LZ4-HC-compressed payload.
pub const TAG_LZ4HC: u8 = b'4';
/// Payload is itself a nested BLTE container.
pub const TAG_NESTED: u8 = b'F';
/// Encrypted payload.
pub const TAG_ENCRYPTED: u8 = b'E';

/// How a block's payload was produced, as declared by its tag byte.
///
/// The codec only carries the tag; actually inflating, decrypting, or
/// recursing into a payload is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    Plain,
    Zlib,
    Lz4hc,
    NestedContainer,
    Encrypted,
    Unknown,
}

impl EncodingMode {
    /// Classify a raw tag byte. Total: unrecognised bytes map to `Unknown`.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            TAG_PLAIN     => EncodingMode::Plain,
            TAG_ZLIB      => EncodingMode::Zlib,
            TAG_LZ4HC     => EncodingMode::Lz4hc,
            TAG_NESTED    => EncodingMode::NestedContainer,
            TAG_ENCRYPTED => EncodingMode::Encrypted,
            _             => EncodingMode::Unknown,
        }
    }

    /// The canonical tag byte, or `None` for `Unknown` (which has no single
    /// wire representation — the original byte lives on the block).
    pub fn tag(self) -> Option<u8> {
        match self {
            EncodingMode::Plain           => Some(TAG_PLAIN),
            EncodingMode::Zlib            => Some(TAG_ZLIB),
            EncodingMode::Lz4hc           => Some(TAG_LZ4HC),
            EncodingMode::NestedContainer => Some(TAG_NESTED),
            EncodingMode::Encrypted       => Some(TAG_ENCRYPTED),
            EncodingMode::Unknown         => None,
        }
    }

    /// Human-readable name (for diagnostics only — never parsed).
    pub fn name(self) -> &'static str {
        match self {
            EncodingMode::Plain           => "plain",
            EncodingMode::Zlib            => "zlib",
            EncodingMode::Lz4hc           => "lz4hc",
            EncodingMode::NestedContainer => "nested",
            EncodingMode::Encrypted       => "encrypted",
            EncodingMode::Unknown         => "unknown",
        }
    }
}
