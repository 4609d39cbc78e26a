//! Network Module
//!
//! Blocking TCP connections to storage nodes.
//!
//! ## Architecture
//! - One connection per request/response cycle
//! - Read/write deadlines come from `Config` and are the only
//!   cancellation mechanism for an in-flight transfer

mod connection;

pub use connection::Connection;
