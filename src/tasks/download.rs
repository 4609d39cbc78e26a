//! Download Task
//!
//! Retrieve-file request (command 14). The response body is the raw file
//! content and is streamed straight into a file or memory buffer.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use bytes::{BufMut, BytesMut};

use crate::config::Config;
use crate::error::{FdfsError, Result, ResultExt};
use crate::protocol::{put_fixed_field, Header, StorageCommand, GROUP_NAME_LEN, HEADER_SIZE};
use crate::transfer::{copy_exact_with_buffer, DEFAULT_BUFFER_SIZE};

/// Fixed fields of a retrieve request: offset (8) + length (8) + group (16)
pub const RETRIEVE_FIXED_LEN: i64 = 8 + 8 + GROUP_NAME_LEN as i64;

/// Retrieve a file (or a byte range of it) from a storage node
pub struct DownloadTask {
    header: Header,
    buffer_size: usize,
}

impl Default for DownloadTask {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadTask {
    pub fn new() -> Self {
        Self {
            header: Header::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            header: Header::default(),
            buffer_size: config.copy_buffer_size,
        }
    }

    /// Last header sent or received
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Send the retrieve request
    ///
    /// `offset` and `download_bytes` are passed through untouched; the
    /// node treats a length of 0 as "to the end of the file".
    pub fn send_header<W: Write + ?Sized>(
        &mut self,
        conn: &mut W,
        group_name: &str,
        remote_filename: &str,
        offset: i64,
        download_bytes: i64,
    ) -> Result<()> {
        self.header = Header::new(
            StorageCommand::DownloadFile,
            remote_filename.len() as i64 + RETRIEVE_FIXED_LEN,
        );

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.header.pkg_len as usize);
        self.header.put(&mut buf);
        buf.put_i64(offset);
        buf.put_i64(download_bytes);
        put_fixed_field(&mut buf, group_name, GROUP_NAME_LEN)
            .op("DownloadTask::send_header")?;
        buf.put_slice(remote_filename.as_bytes());

        tracing::debug!(
            "Sending retrieve request: {}/{} offset={} bytes={}",
            group_name,
            remote_filename,
            offset,
            download_bytes
        );

        conn.write_all(&buf)
            .and_then(|_| conn.flush())
            .map_err(FdfsError::from)
            .op("DownloadTask::send_header")
    }

    /// Receive the file body into `local_filename`, creating or truncating it
    ///
    /// Returns the number of bytes written.
    pub fn recv_file<R, P>(&mut self, conn: &mut R, local_filename: P) -> Result<u64>
    where
        R: Read + ?Sized,
        P: AsRef<Path>,
    {
        self.recv_file_inner(conn, local_filename.as_ref())
            .op("DownloadTask::recv_file")
    }

    fn recv_file_inner<R: Read + ?Sized>(&mut self, conn: &mut R, path: &Path) -> Result<u64> {
        self.header.recv_response(conn, self.buffer_size)?;

        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);

        let copied = copy_exact_with_buffer(conn, &mut writer, self.header.body_len(), self.buffer_size)?;
        writer.flush()?;

        tracing::debug!("Downloaded {} bytes to {}", copied, path.display());
        Ok(copied)
    }

    /// Receive the file body into memory
    pub fn recv_buffer<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<Vec<u8>> {
        self.recv_buffer_inner(conn).op("DownloadTask::recv_buffer")
    }

    fn recv_buffer_inner<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<Vec<u8>> {
        self.header.recv_response(conn, self.buffer_size)?;

        let len = self.header.body_len();
        // Capacity is capped: the length comes off the wire.
        let mut data = Vec::with_capacity(len.min(self.buffer_size as u64) as usize);
        copy_exact_with_buffer(conn, &mut data, len, self.buffer_size)?;

        tracing::debug!("Downloaded {} bytes into memory", data.len());
        Ok(data)
    }
}
