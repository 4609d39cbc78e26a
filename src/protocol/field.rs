//! Fixed-width string fields
//!
//! Group names and file extensions travel as left-justified, zero-padded
//! byte arrays of a fixed width. Decoding stops at the first zero byte.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{FdfsError, Result};

/// Width of the group name field
pub const GROUP_NAME_LEN: usize = 16;

/// Width of the file extension field
pub const FILE_EXT_NAME_LEN: usize = 6;

/// Append `value` zero-padded to exactly `width` bytes
pub fn put_fixed_field(dst: &mut BytesMut, value: &str, width: usize) -> Result<()> {
    let bytes = value.as_bytes();
    if bytes.len() > width {
        return Err(FdfsError::FieldTooLong {
            len: bytes.len(),
            width,
        });
    }

    dst.reserve(width);
    dst.put_slice(bytes);
    dst.put_bytes(0, width - bytes.len());
    Ok(())
}

/// Encode `value` into a standalone `width`-byte field
pub fn encode_fixed_field(value: &str, width: usize) -> Result<Vec<u8>> {
    let mut buf = BytesMut::with_capacity(width);
    put_fixed_field(&mut buf, value, width)?;
    Ok(buf.to_vec())
}

/// Read a zero-terminated string from a `max_len`-byte field
///
/// Always consumes exactly `max_len` bytes, wherever the string ends.
pub fn decode_bounded_string<B: Buf>(buf: &mut B, max_len: usize) -> Result<String> {
    if buf.remaining() < max_len {
        return Err(FdfsError::ShortRead {
            expected: max_len as u64,
            actual: buf.remaining() as u64,
        });
    }

    let field = buf.copy_to_bytes(max_len);
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());

    String::from_utf8(field[..end].to_vec())
        .map_err(|_| FdfsError::ProtocolViolation("string field is not valid UTF-8".to_string()))
}
