//! Tasks Module
//!
//! One request/response cycle per storage command.
//!
//! ## Usage
//! A task runs on a connection owned by the caller:
//! 1. `send_header` (and `send_file` for uploads)
//! 2. the matching receive call
//!
//! Tasks never close the connection. After any error the framing state of
//! the connection is unknown and it should be discarded.

mod types;
mod upload;
mod download;
mod delete;

pub use types::{FileId, FileInfo};
pub use upload::{UploadState, UploadTask, STORE_FIXED_LEN};
pub use download::{DownloadTask, RETRIEVE_FIXED_LEN};
pub use delete::{DeleteTask, DELETE_FIXED_LEN};
