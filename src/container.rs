//! Container codec: fixed header + block table + tagged data section.
//!
//! # Wire layout
//! All integers are big-endian.
//!
//! | Offset | Size      | Field                                        |
//! |--------|-----------|----------------------------------------------|
//! | 0      | 4         | magic `BLTE`                                 |
//! | 4      | 4         | header size = data section start offset      |
//! | 8      | 1         | table format (`0x0F` or `0x10`)              |
//! | 9      | 2         | block count, high 16 bits                    |
//! | 11     | 1         | block count, low 8 bits                      |
//! | 12     | rows      | one 24- or 40-byte row per block             |
//!
//! Each row holds the block's on-disk span size (tag byte included), its
//! logical size, and its hash(es). The data section is the concatenation of
//! `tag byte + payload` spans in row order; block boundaries come entirely
//! from the rows, there is no in-band delimiter.
//!
//! Decode trusts the stored header size as the data section start rather
//! than recomputing it from the block count. Every read is bounds-checked;
//! an overrun surfaces as [`FormatError::Truncated`], never a panic.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

use crate::block::{Block, HASH_LEN};

pub const MAGIC: &[u8; 4] = b"BLTE";

/// Fixed header length; also the offset of the first table row.
pub const HEADER_LEN: usize = 12;

/// Table format with 24-byte rows: span size, logical size, payload hash.
pub const TABLE_FORMAT_COMPACT: u8 = 0x0F;
/// Table format with 40-byte rows: adds the pre-encoding payload hash.
pub const TABLE_FORMAT_EXTENDED: u8 = 0x10;

pub const ROW_SIZE_COMPACT: usize = 24;
pub const ROW_SIZE_EXTENDED: usize = 40;

/// The block count field is 24 bits wide.
pub const MAX_BLOCK_COUNT: usize = 0xFF_FFFF;

// ── Errors ───────────────────────────────────────────────────────────────────

/// Malformed or corrupted serialized container. Decode never returns partial
/// results: it yields a fully consistent block sequence or fails entirely.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("Data is too short to be a valid BLTE container ({0} bytes)")]
    TooShort(usize),
    #[error("Invalid BLTE magic")]
    BadMagic,
    #[error("Unsupported table format byte {0:#04x}")]
    UnsupportedTableFormat(u8),
    #[error("Container declares zero blocks")]
    NoBlocks,
    #[error("Block table row {0} declares a zero-length span")]
    ZeroRawSize(usize),
    #[error("Corrupt or truncated data: need {need} bytes at offset {offset}, buffer is {len} bytes")]
    Truncated { offset: usize, need: usize, len: usize },
}

/// Caller-supplied input that cannot be encoded. Raised before any buffer
/// is allocated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("No blocks to encode")]
    NoBlocks,
    #[error("Unsupported table format byte {0:#04x}")]
    UnsupportedTableFormat(u8),
    #[error("Block count {0} does not fit the 24-bit count field")]
    TooManyBlocks(usize),
    #[error("Block {index} payload of {len} bytes does not fit a u32 span")]
    BlockTooLarge { index: usize, len: usize },
}

fn row_size(table_format: u8) -> Option<usize> {
    match table_format {
        TABLE_FORMAT_COMPACT  => Some(ROW_SIZE_COMPACT),
        TABLE_FORMAT_EXTENDED => Some(ROW_SIZE_EXTENDED),
        _ => None,
    }
}

// ── Decode ───────────────────────────────────────────────────────────────────

/// Decode a serialized container into its blocks and table format byte.
///
/// Payloads are copied out of `data`; the returned blocks hold no aliases
/// into the caller's buffer.
pub fn decode(data: &[u8]) -> Result<(Vec<Block>, u8), FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::TooShort(data.len()));
    }
    if &data[..4] != MAGIC {
        return Err(FormatError::BadMagic);
    }

    let header_size = BigEndian::read_u32(&data[4..8]) as usize;
    let table_format = data[8];
    let row_size = row_size(table_format)
        .ok_or(FormatError::UnsupportedTableFormat(table_format))?;

    // 24-bit count: big-endian u16 at offset 9 shifted left 8, low byte at 11.
    let block_count =
        (((BigEndian::read_u16(&data[9..11]) as u32) << 8) | data[11] as u32) as usize;
    if block_count == 0 {
        return Err(FormatError::NoBlocks);
    }

    let table_end = HEADER_LEN + block_count * row_size;
    if table_end > data.len() {
        return Err(FormatError::Truncated {
            offset: HEADER_LEN,
            need: block_count * row_size,
            len: data.len(),
        });
    }

    let mut blocks = Vec::with_capacity(block_count);
    let mut cursor = header_size;
    for i in 0..block_count {
        let row = HEADER_LEN + i * row_size;
        let raw_size = BigEndian::read_u32(&data[row..row + 4]) as usize;
        if raw_size == 0 {
            // A span too small to hold its own tag byte.
            return Err(FormatError::ZeroRawSize(i));
        }
        let span = cursor
            .checked_add(raw_size)
            .filter(|&end| end <= data.len())
            .ok_or(FormatError::Truncated { offset: cursor, need: raw_size, len: data.len() })?;

        let mut block = Block::new(data[cursor + 1..span].to_vec());
        block.encoding_tag = data[cursor];
        block.logical_size = BigEndian::read_u32(&data[row + 4..row + 8]);
        block.set_hash_bytes(read_hash(data, row + 8));
        if table_format == TABLE_FORMAT_EXTENDED {
            block.set_uncompressed_hash_bytes(read_hash(data, row + 24));
        }

        blocks.push(block);
        cursor = span;
    }

    Ok((blocks, table_format))
}

fn read_hash(data: &[u8], offset: usize) -> [u8; HASH_LEN] {
    let mut hash = [0u8; HASH_LEN];
    hash.copy_from_slice(&data[offset..offset + HASH_LEN]);
    hash
}

// ── Encode ───────────────────────────────────────────────────────────────────

/// Serialize `blocks` into a container using the given table format byte.
///
/// Exact inverse of [`decode`] for any valid non-empty block sequence.
pub fn encode(blocks: &[Block], table_format: u8) -> Result<Vec<u8>, ArgumentError> {
    if blocks.is_empty() {
        return Err(ArgumentError::NoBlocks);
    }
    let row_size = row_size(table_format)
        .ok_or(ArgumentError::UnsupportedTableFormat(table_format))?;
    if blocks.len() > MAX_BLOCK_COUNT {
        return Err(ArgumentError::TooManyBlocks(blocks.len()));
    }

    let header_size = HEADER_LEN + blocks.len() * row_size;
    let mut total_size = header_size;
    for (index, block) in blocks.iter().enumerate() {
        // Span size = payload + 1 tag byte, and it must fit the u32 row field.
        if block.raw_data.len() >= u32::MAX as usize {
            return Err(ArgumentError::BlockTooLarge { index, len: block.raw_data.len() });
        }
        total_size += block.raw_data.len() + 1;
    }

    let mut out = vec![0u8; total_size];
    out[..4].copy_from_slice(MAGIC);
    BigEndian::write_u32(&mut out[4..8], header_size as u32);
    out[8] = table_format;
    // Inverse of the 24-bit count composition in decode.
    BigEndian::write_u16(&mut out[9..11], (blocks.len() >> 8) as u16);
    out[11] = (blocks.len() & 0xFF) as u8;

    let mut cursor = header_size;
    for (i, block) in blocks.iter().enumerate() {
        let row = HEADER_LEN + i * row_size;
        BigEndian::write_u32(&mut out[row..row + 4], block.raw_data.len() as u32 + 1);
        BigEndian::write_u32(&mut out[row + 4..row + 8], block.logical_size);
        out[row + 8..row + 24].copy_from_slice(block.hash());
        if table_format == TABLE_FORMAT_EXTENDED {
            out[row + 24..row + 40].copy_from_slice(block.uncompressed_hash());
        }

        out[cursor] = block.encoding_tag;
        out[cursor + 1..cursor + 1 + block.raw_data.len()].copy_from_slice(&block.raw_data);
        cursor += block.raw_data.len() + 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_fields_land_at_fixed_offsets() {
        let mut block = Block::new(b"abc".to_vec());
        block.encoding_tag = b'Z';
        block.logical_size = 7;
        let buf = encode(&[block], TABLE_FORMAT_COMPACT).unwrap();

        assert_eq!(&buf[..4], b"BLTE");
        assert_eq!(BigEndian::read_u32(&buf[4..8]), 12 + 24);
        assert_eq!(buf[8], 0x0F);
        assert_eq!(&buf[9..12], &[0, 0, 1]);
        assert_eq!(BigEndian::read_u32(&buf[12..16]), 4); // 3 payload bytes + tag
        assert_eq!(BigEndian::read_u32(&buf[16..20]), 7);
        assert_eq!(buf[36], b'Z');
        assert_eq!(&buf[37..40], b"abc");
        assert_eq!(buf.len(), 36 + 4);
    }

    #[test]
    fn count_field_splits_across_hi_and_lo_bytes() {
        let blocks: Vec<Block> = (0..300).map(|_| Block::new(vec![0u8])).collect();
        let buf = encode(&blocks, TABLE_FORMAT_COMPACT).unwrap();
        // 300 = 0x00012C: hi u16 = 0x0001, lo byte = 0x2C.
        assert_eq!(&buf[9..11], &[0x00, 0x01]);
        assert_eq!(buf[11], 0x2C);

        let (decoded, _) = decode(&buf).unwrap();
        assert_eq!(decoded.len(), 300);
    }

    #[test]
    fn decode_trusts_stored_header_size() {
        // Widen the gap between table end and data section; the slack bytes
        // are simply skipped because the cursor starts at the stored offset.
        let mut block = Block::new(b"xy".to_vec());
        block.logical_size = 2;
        let mut buf = encode(&[block.clone()], TABLE_FORMAT_COMPACT).unwrap();
        let data_section = buf.split_off(12 + 24);
        buf.extend_from_slice(&[0xEE; 8]);
        buf.extend_from_slice(&data_section);
        BigEndian::write_u32(&mut buf[4..8], (12 + 24 + 8) as u32);

        let (decoded, _) = decode(&buf).unwrap();
        assert_eq!(decoded, vec![block]);
    }

    #[test]
    fn zero_raw_size_row_is_corruption() {
        let mut buf = encode(&[Block::new(b"a".to_vec())], TABLE_FORMAT_COMPACT).unwrap();
        BigEndian::write_u32(&mut buf[12..16], 0);
        assert_eq!(decode(&buf), Err(FormatError::ZeroRawSize(0)));
    }

    #[test]
    fn oversized_row_span_is_truncation() {
        let mut buf = encode(&[Block::new(b"a".to_vec())], TABLE_FORMAT_COMPACT).unwrap();
        BigEndian::write_u32(&mut buf[12..16], 1000);
        assert!(matches!(decode(&buf), Err(FormatError::Truncated { .. })));
    }
}
