//! Upload Task
//!
//! Store-file request (command 11) and the file id it returns.

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::config::{Config, DEFAULT_MAX_FILE_ID_LEN, MAX_FILE_ID_LEN_LIMIT};
use crate::error::{FdfsError, Result, ResultExt};
use crate::protocol::{
    decode_bounded_string, put_fixed_field, Header, StorageCommand, FILE_EXT_NAME_LEN,
    GROUP_NAME_LEN, HEADER_SIZE,
};
use crate::transfer::{copy_exact_with_buffer, read_full, DEFAULT_BUFFER_SIZE};

use super::{FileId, FileInfo};

/// Fixed fields of a store request: path index (1) + file size (8) + ext (6)
pub const STORE_FIXED_LEN: i64 = 1 + 8 + FILE_EXT_NAME_LEN as i64;

/// Progress of an upload cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    HeaderSent,
    FileSent,
    ResponseReceived,
    Failed,
}

/// Store a file on a storage node
///
/// Steps must run in order: `send_header`, `send_file`, `recv_file_id`.
/// A step that fails moves the task to `Failed`; a step called out of order
/// fails with `InvalidState` without touching the connection.
pub struct UploadTask {
    header: Header,
    state: UploadState,
    buffer_size: usize,
    max_file_id_len: i64,
}

impl Default for UploadTask {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadTask {
    pub fn new() -> Self {
        Self {
            header: Header::default(),
            state: UploadState::Idle,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_file_id_len: DEFAULT_MAX_FILE_ID_LEN,
        }
    }

    /// Take the streaming buffer size and response limit from `config`
    ///
    /// A response limit outside `GROUP_NAME_LEN + 1 ..= MAX_FILE_ID_LEN_LIMIT`
    /// is replaced by `DEFAULT_MAX_FILE_ID_LEN`.
    pub fn with_config(config: &Config) -> Self {
        let valid = GROUP_NAME_LEN as i64 + 1..=MAX_FILE_ID_LEN_LIMIT;
        let max_file_id_len = if valid.contains(&config.max_file_id_len) {
            config.max_file_id_len
        } else {
            tracing::warn!(
                "Ignoring max file id length {}, using {}",
                config.max_file_id_len,
                DEFAULT_MAX_FILE_ID_LEN
            );
            DEFAULT_MAX_FILE_ID_LEN
        };

        Self {
            buffer_size: config.copy_buffer_size,
            max_file_id_len,
            ..Self::new()
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Last header sent or received
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Send the request header and fixed fields
    pub fn send_header<W, R>(
        &mut self,
        conn: &mut W,
        file_info: &FileInfo<R>,
        store_path_index: u8,
    ) -> Result<()>
    where
        W: Write + ?Sized,
        R: Read,
    {
        const OP: &str = "UploadTask::send_header";
        self.expect_state(UploadState::Idle).op(OP)?;

        let result = self.write_request(conn, file_info, store_path_index);
        self.advance(result, UploadState::HeaderSent).op(OP)
    }

    fn write_request<W, R>(
        &mut self,
        conn: &mut W,
        file_info: &FileInfo<R>,
        store_path_index: u8,
    ) -> Result<()>
    where
        W: Write + ?Sized,
        R: Read,
    {
        self.header = Header::new(
            StorageCommand::UploadFile,
            (file_info.file_size() as i64).wrapping_add(STORE_FIXED_LEN),
        );

        let mut buf = BytesMut::with_capacity(HEADER_SIZE + STORE_FIXED_LEN as usize);
        self.header.put(&mut buf);
        buf.put_u8(store_path_index);
        buf.put_u64(file_info.file_size());
        put_fixed_field(&mut buf, file_info.file_ext_name(), FILE_EXT_NAME_LEN)?;

        tracing::debug!(
            "Sending store request: size={} ext={:?} path_index={}",
            file_info.file_size(),
            file_info.file_ext_name(),
            store_path_index
        );

        conn.write_all(&buf)?;
        conn.flush()?;
        Ok(())
    }

    /// Stream the file body onto the connection
    ///
    /// Fails with `SourceTooLong` if the source still has bytes after
    /// `file_size` of them were sent.
    pub fn send_file<W, R>(&mut self, conn: &mut W, file_info: &mut FileInfo<R>) -> Result<()>
    where
        W: Write + ?Sized,
        R: Read,
    {
        const OP: &str = "UploadTask::send_file";
        self.expect_state(UploadState::HeaderSent).op(OP)?;

        let size = file_info.file_size();
        let buffer_size = self.buffer_size;
        let result = copy_exact_with_buffer(file_info.reader(), conn, size, buffer_size)
            .and_then(|_| ensure_exhausted(file_info.reader(), size))
            .and_then(|_| conn.flush().map_err(FdfsError::from));

        if result.is_ok() {
            tracing::debug!("Streamed {} byte file body", size);
        }

        self.advance(result, UploadState::FileSent).op(OP)
    }

    /// Read the response and decode the assigned file id
    pub fn recv_file_id<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<FileId> {
        const OP: &str = "UploadTask::recv_file_id";
        self.expect_state(UploadState::FileSent).op(OP)?;

        let result = self.read_file_id(conn);
        self.advance(result, UploadState::ResponseReceived).op(OP)
    }

    fn read_file_id<R: Read + ?Sized>(&mut self, conn: &mut R) -> Result<FileId> {
        self.header.recv_response(conn, self.buffer_size)?;

        let pkg_len = self.header.pkg_len;
        if pkg_len <= GROUP_NAME_LEN as i64 {
            return Err(FdfsError::ProtocolViolation(format!(
                "file id payload of {} bytes cannot hold a {}-byte group name",
                pkg_len, GROUP_NAME_LEN
            )));
        }
        if pkg_len > self.max_file_id_len {
            return Err(FdfsError::ProtocolViolation(format!(
                "file id payload of {} bytes exceeds limit of {}",
                pkg_len, self.max_file_id_len
            )));
        }

        let mut body = vec![0u8; pkg_len as usize];
        read_full(conn, &mut body)?;

        let mut buf = Bytes::from(body);
        let group_name = decode_bounded_string(&mut buf, GROUP_NAME_LEN)?;
        let remote_file_name = decode_bounded_string(&mut buf, pkg_len as usize - GROUP_NAME_LEN)?;

        let file_id = FileId {
            group_name,
            remote_file_name,
        };
        tracing::debug!("Stored file as {}", file_id);
        Ok(file_id)
    }

    fn expect_state(&self, expected: UploadState) -> Result<()> {
        if self.state != expected {
            return Err(FdfsError::InvalidState(format!(
                "expected {:?}, task is {:?}",
                expected, self.state
            )));
        }
        Ok(())
    }

    fn advance<T>(&mut self, result: Result<T>, next: UploadState) -> Result<T> {
        self.state = if result.is_ok() { next } else { UploadState::Failed };
        result
    }
}

/// Check that `source` is at EOF
fn ensure_exhausted<R: Read + ?Sized>(source: &mut R, declared: u64) -> Result<()> {
    let mut extra = [0u8; 1];
    loop {
        match source.read(&mut extra) {
            Ok(0) => return Ok(()),
            Ok(_) => return Err(FdfsError::SourceTooLong { declared }),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
