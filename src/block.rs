use std::fmt;
use thiserror::Error;

use crate::encoding::{EncodingMode, TAG_PLAIN};

/// Both integrity hashes are fixed at 16 bytes by the table-row layout.
pub const HASH_LEN: usize = 16;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Hash must be exactly {HASH_LEN} bytes, got {0}")]
    HashLength(usize),
}

/// One logical chunk of a container: an encoding tag, two integrity hashes,
/// the pre-encoding size, and the encoded payload.
///
/// The hash fields are write-guarded: the table row reserves exactly 16 bytes
/// for each, so the setters reject any other length up front rather than
/// letting serialization truncate or pad. The codec stores and returns the
/// hashes verbatim — verifying them against the payload is a caller concern,
/// since no hash algorithm is part of the container format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Raw tag byte naming how `raw_data` was produced. Not validated;
    /// classification happens lazily in [`Block::encoding_mode`].
    pub encoding_tag: u8,
    /// Size of the data before encoding. Caller-supplied; not cross-checked
    /// against the payload length.
    pub logical_size: u32,
    /// The encoded payload, excluding the leading tag byte.
    pub raw_data: Vec<u8>,
    hash: [u8; HASH_LEN],
    uncompressed_hash: [u8; HASH_LEN],
}

impl Block {
    /// A block owning `raw_data`, tagged plain, with zeroed hashes and a
    /// zero logical size.
    pub fn new(raw_data: Vec<u8>) -> Self {
        Self {
            encoding_tag: TAG_PLAIN,
            logical_size: 0,
            raw_data,
            hash: [0u8; HASH_LEN],
            uncompressed_hash: [0u8; HASH_LEN],
        }
    }

    /// Classify the tag byte. Never fails: unrecognised tags read as
    /// [`EncodingMode::Unknown`] without blocking any operation.
    pub fn encoding_mode(&self) -> EncodingMode {
        EncodingMode::from_tag(self.encoding_tag)
    }

    /// Integrity hash of the encoded payload.
    pub fn hash(&self) -> &[u8; HASH_LEN] {
        &self.hash
    }

    /// Integrity hash of the pre-encoding payload. Only serialized when the
    /// container's table format carries it.
    pub fn uncompressed_hash(&self) -> &[u8; HASH_LEN] {
        &self.uncompressed_hash
    }

    pub fn set_hash(&mut self, hash: &[u8]) -> Result<(), ValidationError> {
        self.hash = check_len(hash)?;
        Ok(())
    }

    pub fn set_uncompressed_hash(&mut self, hash: &[u8]) -> Result<(), ValidationError> {
        self.uncompressed_hash = check_len(hash)?;
        Ok(())
    }

    // Infallible typed setters for the decode path, where the row layout
    // already fixes the width.
    pub(crate) fn set_hash_bytes(&mut self, hash: [u8; HASH_LEN]) {
        self.hash = hash;
    }

    pub(crate) fn set_uncompressed_hash_bytes(&mut self, hash: [u8; HASH_LEN]) {
        self.uncompressed_hash = hash;
    }
}

fn check_len(hash: &[u8]) -> Result<[u8; HASH_LEN], ValidationError> {
    <[u8; HASH_LEN]>::try_from(hash).map_err(|_| ValidationError::HashLength(hash.len()))
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(mode={}, logical_size={}, hash={}, uncompressed_hash={})",
            self.encoding_mode().name(),
            self.logical_size,
            hex::encode(self.hash),
            hex::encode(self.uncompressed_hash),
        )
    }
}
