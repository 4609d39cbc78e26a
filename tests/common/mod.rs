//! Shared test helpers
//!
//! In-memory connections and misbehaving readers/writers.

#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};

use fdfs_storage::protocol::{Header, StorageCommand};

/// A duplex connection: reads come from a canned response, writes are
/// captured for inspection
pub struct MockConn {
    input: Cursor<Vec<u8>>,
    pub output: Vec<u8>,
}

impl MockConn {
    pub fn new(response: Vec<u8>) -> Self {
        Self {
            input: Cursor::new(response),
            output: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Bytes of the canned response not yet read
    pub fn unread(&self) -> usize {
        self.input.get_ref().len() - self.input.position() as usize
    }
}

impl Read for MockConn {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for MockConn {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Encode a storage node response: header + body
pub fn response(status: u8, body: &[u8]) -> Vec<u8> {
    let header = Header {
        cmd: StorageCommand::Response.into(),
        pkg_len: body.len() as i64,
        status,
    };
    let mut out = header.encode().to_vec();
    out.extend_from_slice(body);
    out
}

/// Zero-padded group field followed by the remote file name
pub fn file_id_body(group: &str, remote: &str) -> Vec<u8> {
    let mut body = vec![0u8; 16];
    body[..group.len()].copy_from_slice(group.as_bytes());
    body.extend_from_slice(remote.as_bytes());
    body
}

/// Reader that hands out at most `chunk` bytes per call
pub struct TrickleReader {
    data: Cursor<Vec<u8>>,
    chunk: usize,
}

impl TrickleReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        Self {
            data: Cursor::new(data),
            chunk,
        }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk);
        self.data.read(&mut buf[..n])
    }
}

/// Reader that fails with `Interrupted` before every successful read
pub struct InterruptingReader {
    data: Cursor<Vec<u8>>,
    interrupt_next: bool,
}

impl InterruptingReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(data),
            interrupt_next: true,
        }
    }
}

impl Read for InterruptingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        }
        self.interrupt_next = true;
        self.data.read(buf)
    }
}

/// Writer that accepts `limit` bytes and then reports zero-length writes
pub struct LimitedWriter {
    pub data: Vec<u8>,
    limit: usize,
}

impl LimitedWriter {
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.data.len();
        let n = buf.len().min(room);
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer whose every call fails
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Deterministic test payload
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
