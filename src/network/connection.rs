//! Storage node connection
//!
//! A TCP stream split into buffered read and write halves.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{FdfsError, Result};

/// Connection to a single storage node
///
/// Implements `Read` and `Write` so tasks can run directly on it. Writes are
/// buffered; tasks flush at the end of every request.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to `config.storage_addr` and apply the configured timeouts
    pub fn connect(config: &Config) -> Result<Self> {
        let addrs: Vec<_> = config.storage_addr.to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(FdfsError::Config(format!(
                "storage address {} did not resolve",
                config.storage_addr
            )));
        }

        let mut last_err = None;
        for addr in &addrs {
            let attempt = if config.connect_timeout_ms > 0 {
                TcpStream::connect_timeout(addr, Duration::from_millis(config.connect_timeout_ms))
            } else {
                TcpStream::connect(addr)
            };

            match attempt {
                Ok(stream) => {
                    let mut conn = Self::from_stream(stream)?;
                    conn.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
                    return Ok(conn);
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "no address"))
            .into())
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Requests are small and latency-bound
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to storage node {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction without a deadline)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.reader.get_ref();
        let write_stream = self.writer.get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Flush pending writes and close both directions
    pub fn close(mut self) -> Result<()> {
        self.writer.flush()?;
        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Peer already gone
            Err(ref e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!("Closed connection to {}", self.peer_addr);
        Ok(())
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
