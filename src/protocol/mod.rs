//! Protocol Module
//!
//! Wire format spoken between the client and a storage node.
//!
//! ## Header (every request and response)
//! ```text
//! ┌──────────┬──────────────────────┬───────────┐
//! │ Cmd (1)  │ Payload Len (8, BE)  │ Status (1)│
//! └──────────┴──────────────────────┴───────────┘
//! ```
//!
//! ### Commands
//! - 11: STORE    - `[path index (1)][file size (8)][ext (6)]` + file bytes
//! - 12: DELETE   - `[group (16)][remote file name]`
//! - 14: RETRIEVE - `[offset (8)][length (8)][group (16)][remote file name]`
//! - 100: response sent back by the node
//!
//! ### Status
//! - 0: OK
//! - anything else: server-side failure (errno-style code)
//!
//! Remote file names are never padded or length-prefixed; their length is
//! whatever is left of the payload after the fixed fields.

mod command;
mod header;
mod field;

pub use command::{StorageCommand, STATUS_OK};
pub use header::{decode_header, encode_header, Header, HEADER_SIZE, MAX_ERROR_DRAIN};
pub use field::{
    decode_bounded_string, encode_fixed_field, put_fixed_field, FILE_EXT_NAME_LEN,
    GROUP_NAME_LEN,
};
