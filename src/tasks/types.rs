//! Upload input and output types

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FdfsError, Result};
use crate::protocol::GROUP_NAME_LEN;

/// A local file (or any byte source) to upload
#[derive(Debug)]
pub struct FileInfo<R> {
    /// Number of bytes that will be read from `file`
    file_size: u64,

    /// Extension stored with the file, without the dot (at most 6 bytes)
    file_ext_name: String,

    /// Byte source holding exactly `file_size` bytes
    file: R,
}

impl<R: Read> FileInfo<R> {
    /// Wrap a reader whose length is known in advance
    ///
    /// `file` must hold exactly `file_size` bytes: fewer fail the upload
    /// with `ShortRead`, more with `SourceTooLong`.
    pub fn new(file: R, file_size: u64, file_ext_name: impl Into<String>) -> Self {
        Self {
            file_size,
            file_ext_name: file_ext_name.into(),
            file,
        }
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn file_ext_name(&self) -> &str {
        &self.file_ext_name
    }

    /// The underlying byte source
    pub fn reader(&mut self) -> &mut R {
        &mut self.file
    }

    pub fn into_inner(self) -> R {
        self.file
    }
}

impl FileInfo<File> {
    /// Open a local file, taking the size from its metadata and the
    /// extension from its name
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Ok(Self::new(file, file_size, ext))
    }
}

impl<'a> FileInfo<&'a [u8]> {
    /// Upload an in-memory buffer
    pub fn from_buffer(data: &'a [u8], file_ext_name: impl Into<String>) -> Self {
        Self::new(data, data.len() as u64, file_ext_name)
    }
}

/// Identifier assigned by the storage node to a stored file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId {
    /// Storage group holding the file
    pub group_name: String,

    /// Path of the file inside its group, e.g. `M00/00/00/abc.txt`
    pub remote_file_name: String,
}

impl FileId {
    pub fn new(group_name: impl Into<String>, remote_file_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            remote_file_name: remote_file_name.into(),
        }
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_name, self.remote_file_name)
    }
}

impl FromStr for FileId {
    type Err = FdfsError;

    /// Parse `<group>/<remote file name>`
    fn from_str(s: &str) -> Result<Self> {
        let (group, remote) = s
            .split_once('/')
            .ok_or_else(|| FdfsError::InvalidFileId(format!("missing '/' in {:?}", s)))?;

        if group.is_empty() || remote.is_empty() {
            return Err(FdfsError::InvalidFileId(format!(
                "empty group or file name in {:?}",
                s
            )));
        }
        if group.len() > GROUP_NAME_LEN {
            return Err(FdfsError::InvalidFileId(format!(
                "group name {:?} longer than {} bytes",
                group, GROUP_NAME_LEN
            )));
        }

        Ok(Self::new(group, remote))
    }
}
