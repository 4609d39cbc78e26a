//! Header codec
//!
//! The fixed 10-byte header shared by every request and response.
//!
//! ```text
//! ┌──────────┬──────────────────────┬───────────┐
//! │ Cmd (1)  │ Payload Len (8, BE)  │ Status (1)│
//! └──────────┴──────────────────────┴───────────┘
//! ```

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{FdfsError, Result};
use crate::transfer::{copy_exact_with_buffer, read_full};

use super::{StorageCommand, STATUS_OK};

/// Header size: 1 byte command + 8 bytes payload length + 1 byte status
pub const HEADER_SIZE: usize = 10;

/// Largest error payload discarded after a failed response
pub const MAX_ERROR_DRAIN: i64 = 4096;

/// Encode a request header
///
/// Status is always 0 on requests.
pub fn encode_header(cmd: u8, pkg_len: i64) -> [u8; HEADER_SIZE] {
    Header {
        cmd,
        pkg_len,
        status: STATUS_OK,
    }
    .encode()
}

/// Decode a header from the first `HEADER_SIZE` bytes of `bytes`
pub fn decode_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(FdfsError::ShortRead {
            expected: HEADER_SIZE as u64,
            actual: bytes.len() as u64,
        });
    }

    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&bytes[1..9]);
    let pkg_len = i64::from_be_bytes(len_bytes);

    if pkg_len < 0 {
        return Err(FdfsError::MalformedHeader(pkg_len));
    }

    Ok(Header {
        cmd: bytes[0],
        pkg_len,
        status: bytes[9],
    })
}

/// Command header
///
/// Every task embeds one: requests fill it in before sending, responses
/// overwrite it on receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Command code
    pub cmd: u8,

    /// Number of bytes following the header
    pub pkg_len: i64,

    /// Status code (meaningful on responses only)
    pub status: u8,
}

impl Header {
    /// Create a request header
    pub fn new(cmd: StorageCommand, pkg_len: i64) -> Self {
        Self {
            cmd: cmd.into(),
            pkg_len,
            status: STATUS_OK,
        }
    }

    /// Serialize to the 10-byte wire form
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0] = self.cmd;
        out[1..9].copy_from_slice(&self.pkg_len.to_be_bytes());
        out[9] = self.status;
        out
    }

    /// Append the wire form to a request buffer
    pub fn put(&self, dst: &mut BytesMut) {
        dst.put_u8(self.cmd);
        dst.put_i64(self.pkg_len);
        dst.put_u8(self.status);
    }

    /// Write the header to a connection
    pub fn send<W: Write + ?Sized>(&self, conn: &mut W) -> Result<()> {
        conn.write_all(&self.encode())?;
        Ok(())
    }

    /// Read a header from a connection into `self`
    pub fn recv<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE];
        read_full(conn, &mut buf)?;
        *self = decode_header(&buf)?;

        tracing::trace!(
            "Received header: cmd={} pkg_len={} status={}",
            self.cmd,
            self.pkg_len,
            self.status
        );
        Ok(())
    }

    /// Read a response header and fail on a non-zero status
    ///
    /// A non-zero status always surfaces as `ServerError`. Up to
    /// `MAX_ERROR_DRAIN` bytes of payload attached to a failed response are
    /// read and discarded on a best-effort basis; a larger or truncated
    /// payload is left for the caller, who must drop the connection.
    pub fn recv_response<R: Read + ?Sized>(
        &mut self,
        conn: &mut R,
        buffer_size: usize,
    ) -> Result<()> {
        self.recv(conn)?;

        if self.cmd != u8::from(StorageCommand::Response) {
            tracing::debug!("Unexpected response command code {}", self.cmd);
        }

        if self.status != STATUS_OK {
            tracing::warn!(
                "Storage node returned status {} ({} payload bytes)",
                self.status,
                self.pkg_len
            );
            self.drain_error_body(conn, buffer_size);
            return Err(FdfsError::ServerError {
                status: self.status,
            });
        }
        Ok(())
    }

    fn drain_error_body<R: Read + ?Sized>(&self, conn: &mut R, buffer_size: usize) {
        if self.pkg_len == 0 {
            return;
        }
        if self.pkg_len > MAX_ERROR_DRAIN {
            tracing::debug!(
                "Not draining {} byte error payload (limit {})",
                self.pkg_len,
                MAX_ERROR_DRAIN
            );
            return;
        }
        if let Err(e) = copy_exact_with_buffer(conn, &mut io::sink(), self.body_len(), buffer_size)
        {
            tracing::debug!("Failed to drain error payload: {}", e);
        }
    }

    /// Payload length as an unsigned byte count
    ///
    /// Headers produced by `decode_header` are never negative.
    pub fn body_len(&self) -> u64 {
        self.pkg_len.max(0) as u64
    }
}
