//! Configuration for fdfs-storage
//!
//! Centralized configuration with sensible defaults.

use crate::error::{FdfsError, Result};
use crate::protocol::GROUP_NAME_LEN;
use crate::transfer::DEFAULT_BUFFER_SIZE;

/// Upper bound on a store response payload (group field + remote file name).
///
/// Not derived from any field width; the storage node never returns a file
/// id this long. Kept configurable through [`Config::max_file_id_len`].
pub const DEFAULT_MAX_FILE_ID_LEN: i64 = 100;

/// Hard ceiling for [`Config::max_file_id_len`]; the response body is
/// allocated up front.
pub const MAX_FILE_ID_LEN_LIMIT: i64 = 4096;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Storage node address (host:port)
    pub storage_addr: String,

    /// Connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Transfer Configuration
    // -------------------------------------------------------------------------
    /// Size of the intermediate buffer used when streaming file bodies
    pub copy_buffer_size: usize,

    /// Largest store response payload accepted before the framing is
    /// treated as corrupt
    pub max_file_id_len: i64,

    /// Storage path (disk) index sent with uploads
    pub store_path_index: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_addr: "127.0.0.1:23000".to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            write_timeout_ms: 30000,
            copy_buffer_size: DEFAULT_BUFFER_SIZE,
            max_file_id_len: DEFAULT_MAX_FILE_ID_LEN,
            store_path_index: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that would make every transfer fail
    pub fn validate(&self) -> Result<()> {
        if self.storage_addr.is_empty() {
            return Err(FdfsError::Config("storage address is empty".to_string()));
        }
        if self.copy_buffer_size == 0 {
            return Err(FdfsError::Config(
                "copy buffer size must be non-zero".to_string(),
            ));
        }
        if self.max_file_id_len <= GROUP_NAME_LEN as i64 {
            return Err(FdfsError::Config(format!(
                "max file id length {} must exceed the {}-byte group field",
                self.max_file_id_len, GROUP_NAME_LEN
            )));
        }
        if self.max_file_id_len > MAX_FILE_ID_LEN_LIMIT {
            return Err(FdfsError::Config(format!(
                "max file id length {} exceeds the limit of {}",
                self.max_file_id_len, MAX_FILE_ID_LEN_LIMIT
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage node address
    pub fn storage_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.storage_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the streaming buffer size (in bytes)
    pub fn copy_buffer_size(mut self, size: usize) -> Self {
        self.config.copy_buffer_size = size;
        self
    }

    /// Set the store response payload limit
    pub fn max_file_id_len(mut self, len: i64) -> Self {
        self.config.max_file_id_len = len;
        self
    }

    /// Set the storage path index used for uploads
    pub fn store_path_index(mut self, index: u8) -> Self {
        self.config.store_path_index = index;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
