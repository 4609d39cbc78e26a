//! Command definitions
//!
//! Command codes understood by a storage node.

/// Status byte of a successful response
pub const STATUS_OK: u8 = 0;

/// Storage node command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StorageCommand {
    /// Store a file
    UploadFile = 11,

    /// Delete a stored file
    DeleteFile = 12,

    /// Retrieve a stored file (or a byte range of it)
    DownloadFile = 14,

    /// Command code carried by every response
    Response = 100,
}

impl StorageCommand {
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            11 => Some(Self::UploadFile),
            12 => Some(Self::DeleteFile),
            14 => Some(Self::DownloadFile),
            100 => Some(Self::Response),
            _ => None,
        }
    }
}

impl From<StorageCommand> for u8 {
    fn from(cmd: StorageCommand) -> u8 {
        cmd as u8
    }
}
