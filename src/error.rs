//! Error types for fdfs-storage
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FdfsError
pub type Result<T> = std::result::Result<T, FdfsError>;

/// Unified error type for storage-node operations
#[derive(Debug, Error)]
pub enum FdfsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },

    #[error("Short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: u64, actual: u64 },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed header: negative payload length {0}")]
    MalformedHeader(i64),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Field too long: {len} bytes does not fit a {width}-byte field")]
    FieldTooLong { len: usize, width: usize },

    #[error("Server error: status {status}")]
    ServerError { status: u8 },

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid task state: {0}")]
    InvalidState(String),

    #[error("Invalid file id: {0}")]
    InvalidFileId(String),

    #[error("Source holds more than the declared {declared} bytes")]
    SourceTooLong { declared: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Context
    // -------------------------------------------------------------------------
    #[error("{op}: {source}")]
    Op {
        op: &'static str,
        #[source]
        source: Box<FdfsError>,
    },
}

impl FdfsError {
    /// Wrap this error with the name of the operation that produced it
    pub fn context(self, op: &'static str) -> Self {
        FdfsError::Op {
            op,
            source: Box::new(self),
        }
    }

    /// The underlying error with all operation wrappers removed
    pub fn root_cause(&self) -> &FdfsError {
        let mut err = self;
        while let FdfsError::Op { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// Status byte reported by the storage node, if this is a server error
    pub fn server_status(&self) -> Option<u8> {
        match self.root_cause() {
            FdfsError::ServerError { status } => Some(*status),
            _ => None,
        }
    }
}

/// Attach an operation name to the error of a `Result`
pub trait ResultExt<T> {
    fn op(self, op: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn op(self, op: &'static str) -> Result<T> {
        self.map_err(|e| e.context(op))
    }
}
