//! Stream copier
//!
//! One bounded-buffer copy loop used for upload bodies (file -> connection)
//! and download bodies (connection -> file or memory).

use std::io::{ErrorKind, Read, Write};

use crate::error::{FdfsError, Result};

/// Default intermediate buffer size (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Copy exactly `length` bytes from `source` to `sink`
pub fn copy_exact<R, W>(source: &mut R, sink: &mut W, length: u64) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    copy_exact_with_buffer(source, sink, length, DEFAULT_BUFFER_SIZE)
}

/// Copy exactly `length` bytes using a buffer of at most `buffer_size` bytes
///
/// Returns the number of bytes moved, which is always `length` on success.
pub fn copy_exact_with_buffer<R, W>(
    source: &mut R,
    sink: &mut W,
    length: u64,
    buffer_size: usize,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    if length == 0 {
        return Ok(0);
    }

    let cap = length.min(buffer_size.max(1) as u64) as usize;
    let mut buf = vec![0u8; cap];
    let mut copied: u64 = 0;

    while copied < length {
        let want = (length - copied).min(cap as u64) as usize;

        let n = match source.read(&mut buf[..want]) {
            Ok(0) => {
                return Err(FdfsError::ShortRead {
                    expected: length,
                    actual: copied,
                })
            }
            Ok(n) => n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        write_chunk(sink, &buf[..n], length, copied)?;
        copied += n as u64;
    }

    tracing::trace!("Copied {} bytes", copied);
    Ok(copied)
}

/// Write one chunk, mapping a sink that stops accepting data to `ShortWrite`
fn write_chunk<W: Write + ?Sized>(sink: &mut W, mut chunk: &[u8], length: u64, copied: u64) -> Result<()> {
    let mut written = copied;
    while !chunk.is_empty() {
        match sink.write(chunk) {
            Ok(0) => {
                return Err(FdfsError::ShortWrite {
                    expected: length,
                    actual: written,
                })
            }
            Ok(n) => {
                chunk = &chunk[n..];
                written += n as u64;
            }
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Fill `buf` completely from `source`
///
/// A source that ends early yields `ShortRead` with the count actually read.
pub fn read_full<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(FdfsError::ShortRead {
                    expected: buf.len() as u64,
                    actual: filled as u64,
                })
            }
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
