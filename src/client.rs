//! Client Module
//!
//! Runs one task cycle per call on a fresh connection.
//!
//! ## Responsibilities
//! - Open a connection to the configured storage node
//! - Drive the task through its send/receive steps
//! - Close the connection afterwards (it is never reused, so a failed
//!   transfer cannot leave a half-read frame behind for the next call)

use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::network::Connection;
use crate::tasks::{DeleteTask, DownloadTask, FileId, FileInfo, UploadTask};

/// Client for a single storage node
pub struct StorageClient {
    config: Config,
}

impl StorageClient {
    /// Create a client, rejecting unusable configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open a new connection to the storage node
    pub fn connect(&self) -> Result<Connection> {
        Connection::connect(&self.config)
    }

    /// Upload a local file, taking the extension from its name
    pub fn upload_file(&self, path: impl AsRef<Path>) -> Result<FileId> {
        let mut file_info = FileInfo::from_path(path.as_ref())?;
        self.upload(&mut file_info)
    }

    /// Upload an in-memory buffer
    pub fn upload_buffer(&self, data: &[u8], file_ext_name: &str) -> Result<FileId> {
        let mut file_info = FileInfo::from_buffer(data, file_ext_name);
        self.upload(&mut file_info)
    }

    /// Upload any byte source of known length
    pub fn upload<R: Read>(&self, file_info: &mut FileInfo<R>) -> Result<FileId> {
        let mut conn = self.connect()?;
        let mut task = UploadTask::with_config(&self.config);

        task.send_header(&mut conn, file_info, self.config.store_path_index)?;
        task.send_file(&mut conn, file_info)?;
        let file_id = task.recv_file_id(&mut conn)?;

        conn.close()?;
        tracing::info!("Uploaded {} bytes as {}", file_info.file_size(), file_id);
        Ok(file_id)
    }

    /// Download a file (or the `length` bytes at `offset`; 0 means to the end)
    /// into `local_path`
    pub fn download_to_file(
        &self,
        file_id: &FileId,
        local_path: impl AsRef<Path>,
        offset: i64,
        length: i64,
    ) -> Result<u64> {
        let mut conn = self.connect()?;
        let mut task = DownloadTask::with_config(&self.config);

        task.send_header(
            &mut conn,
            &file_id.group_name,
            &file_id.remote_file_name,
            offset,
            length,
        )?;
        let copied = task.recv_file(&mut conn, local_path.as_ref())?;

        conn.close()?;
        tracing::info!(
            "Downloaded {} ({} bytes) to {}",
            file_id,
            copied,
            local_path.as_ref().display()
        );
        Ok(copied)
    }

    /// Download a file (or a byte range of it) into memory
    pub fn download_to_buffer(&self, file_id: &FileId, offset: i64, length: i64) -> Result<Vec<u8>> {
        let mut conn = self.connect()?;
        let mut task = DownloadTask::with_config(&self.config);

        task.send_header(
            &mut conn,
            &file_id.group_name,
            &file_id.remote_file_name,
            offset,
            length,
        )?;
        let data = task.recv_buffer(&mut conn)?;

        conn.close()?;
        tracing::info!("Downloaded {} ({} bytes)", file_id, data.len());
        Ok(data)
    }

    /// Delete a stored file
    pub fn delete_file(&self, file_id: &FileId) -> Result<()> {
        let mut conn = self.connect()?;
        let mut task = DeleteTask::with_config(&self.config);

        task.send_header(&mut conn, &file_id.group_name, &file_id.remote_file_name)?;
        task.recv_result(&mut conn)?;

        conn.close()?;
        tracing::info!("Deleted {}", file_id);
        Ok(())
    }
}
