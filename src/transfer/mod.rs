//! Transfer Module
//!
//! Moves file bodies between a connection and a local source/sink.
//!
//! ## Responsibilities
//! - Copy exactly N bytes through a bounded buffer
//! - Detect a source that ends early or a sink that stops accepting data
//! - Leave both endpoints open

mod copy;

pub use copy::{copy_exact, copy_exact_with_buffer, read_full, DEFAULT_BUFFER_SIZE};
