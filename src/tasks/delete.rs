//! Delete Task
//!
//! Delete-file request (command 12). The response has no body; only the
//! status byte matters.

use std::io::{Read, Write};

use bytes::{BufMut, BytesMut};

use crate::config::Config;
use crate::error::{FdfsError, Result, ResultExt};
use crate::protocol::{put_fixed_field, Header, StorageCommand, GROUP_NAME_LEN, HEADER_SIZE};
use crate::transfer::DEFAULT_BUFFER_SIZE;

/// Fixed fields of a delete request: group (16)
pub const DELETE_FIXED_LEN: i64 = GROUP_NAME_LEN as i64;

/// Delete a file from a storage node
pub struct DeleteTask {
    header: Header,
    buffer_size: usize,
}

impl Default for DeleteTask {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteTask {
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

    /// Send the delete request
    pub fn send_header<W: Write + ?Sized>(
        &mut self,
        conn: &mut W,
        group_name: &str,
        remote_filename: &str,
    ) -> Result<()> {
        self.header = Header::new(
            StorageCommand::DeleteFile,
            remote_filename.len() as i64 + DELETE_FIXED_LEN,
        );

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.header.pkg_len as usize);
        self.header.put(&mut buf);
        put_fixed_field(&mut buf, group_name, GROUP_NAME_LEN).op("DeleteTask::send_header")?;
        buf.put_slice(remote_filename.as_bytes());

        tracing::debug!("Sending delete request: {}/{}", group_name, remote_filename);

        conn.write_all(&buf)
            .and_then(|_| conn.flush())
            .map_err(FdfsError::from)
            .op("DeleteTask::send_header")
    }

    /// Read the response header; a non-zero status is a `ServerError`
    pub fn recv_result<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<()> {
        self.header
            .recv_response(conn, self.buffer_size)
            .op("DeleteTask::recv_result")
    }
}
