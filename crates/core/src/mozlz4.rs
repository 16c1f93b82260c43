//! Firefox's `mozLz4` container.
//!
//! Layout: the 8 byte magic `mozLz40\0`, the decompressed length as a
//! little-endian `u32`, then a single raw LZ4 block.

use crate::error::DecodeError;

pub const MAGIC: &[u8; 8] = b"mozLz40\0";

/// Upper bound on the declared decompressed size. Real session files are a
/// few megabytes; anything near this is a corrupt header.
pub const MAX_DECODED_LEN: usize = 256 * 1024 * 1024;

pub fn has_magic(bytes: &[u8]) -> bool {
	bytes.starts_with(MAGIC)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
	let body = bytes.strip_prefix(MAGIC).ok_or(DecodeError::BadMagic)?;
	let (len, block) = body
		.split_first_chunk::<4>()
		.ok_or(DecodeError::Truncated(bytes.len()))?;

	let len = u32::from_le_bytes(*len) as usize;
	if len > MAX_DECODED_LEN {
		return Err(DecodeError::TooLarge(len));
	}

	Ok(lz4_flex::block::decompress(block, len)?)
}

/// Wrap raw bytes in a `mozLz4` container, as Firefox writes them.
pub fn encode(raw: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(MAGIC.len() + 4 + raw.len());
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&lz4_flex::block::compress_prepend_size(raw));
	out
}
