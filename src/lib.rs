//! # fdfs-storage
//!
//! Blocking client for the storage-node protocol of a distributed file
//! store:
//! - Fixed 10-byte command header with big-endian payload length
//! - Zero-padded fixed-width string fields
//! - Streamed file bodies in both directions (bounded memory)
//! - Store, retrieve and delete commands
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    StorageClient / CLI                       │
//! │              (one connection per operation)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Tasks                                │
//! │            Upload (11) / Download (14) / Delete (12)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌──────────────┐ ┌─────────────┐
//!   │   Header    │ │ Fixed fields │ │   Stream    │
//!   │   codec     │ │  (C-string)  │ │   copier    │
//!   └─────────────┘ └──────────────┘ └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transfer;
pub mod tasks;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FdfsError, Result};
pub use config::Config;
pub use client::StorageClient;
pub use tasks::{DeleteTask, DownloadTask, FileId, FileInfo, UploadTask};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fdfs-storage
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
