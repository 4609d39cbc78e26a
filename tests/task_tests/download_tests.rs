//! Download Task Tests
//!
//! These tests verify:
//! - Retrieve request wire layout
//! - Streaming the body into a file and into memory
//! - Server errors and truncated bodies

#[path = "../common/mod.rs"]
mod common;

use std::fs;

use common::{payload, response, MockConn, TrickleReader};
use fdfs_storage::tasks::{DownloadTask, RETRIEVE_FIXED_LEN};
use fdfs_storage::{Config, FdfsError};
use tempfile::TempDir;

// =============================================================================
// Request Encoding
// =============================================================================

#[test]
fn test_retrieve_request_layout() {
    let mut conn = MockConn::empty();
    let mut task = DownloadTask::new();
    task.send_header(&mut conn, "group1", "M00/00/00/abc.txt", 100, 4096)
        .unwrap();

    let out = &conn.output;
    assert_eq!(out.len(), 10 + 32 + 17);
    assert_eq!(out[0], 14);
    assert_eq!(&out[1..9], &49i64.to_be_bytes());
    assert_eq!(out[9], 0);
    assert_eq!(&out[10..18], &100i64.to_be_bytes());
    assert_eq!(&out[18..26], &4096i64.to_be_bytes());
    assert_eq!(&out[26..42], b"group1\0\0\0\0\0\0\0\0\0\0");
    assert_eq!(&out[42..], b"M00/00/00/abc.txt");
}

#[test]
fn test_retrieve_payload_length_formula() {
    let long = "x".repeat(200);
    for remote in ["", "a", "M00/00/00/abc.txt", long.as_str()] {
        let mut conn = MockConn::empty();
        let mut task = DownloadTask::new();
        task.send_header(&mut conn, "g", remote, 0, 0).unwrap();

        assert_eq!(task.header().pkg_len, remote.len() as i64 + 32);
        assert_eq!(conn.output.len() as i64, 10 + task.header().pkg_len);
    }
    assert_eq!(RETRIEVE_FIXED_LEN, 32);
}

#[test]
fn test_whole_file_sentinels_pass_through() {
    let mut conn = MockConn::empty();
    let mut task = DownloadTask::new();
    task.send_header(&mut conn, "g", "r", 0, -1).unwrap();

    assert_eq!(&conn.output[10..18], &0i64.to_be_bytes());
    assert_eq!(&conn.output[18..26], &(-1i64).to_be_bytes());
}

#[test]
fn test_group_name_too_long() {
    let mut conn = MockConn::empty();
    let mut task = DownloadTask::new();
    let err = task
        .send_header(&mut conn, "a-very-long-group-name", "r", 0, 0)
        .unwrap_err();

    assert!(matches!(err.root_cause(), FdfsError::FieldTooLong { .. }));
    assert!(err.to_string().starts_with("DownloadTask::send_header"));
    assert!(conn.output.is_empty());
}

// =============================================================================
// Receive into Memory
// =============================================================================

#[test]
fn test_recv_buffer() {
    let data = payload(5000);
    let mut conn = MockConn::new(response(0, &data));
    let mut task = DownloadTask::new();

    assert_eq!(task.recv_buffer(&mut conn).unwrap(), data);
    assert_eq!(conn.unread(), 0);
}

#[test]
fn test_recv_buffer_empty_body() {
    let mut conn = MockConn::new(response(0, b""));
    let mut task = DownloadTask::new();
    assert!(task.recv_buffer(&mut conn).unwrap().is_empty());
}

#[test]
fn test_recv_buffer_small_chunks() {
    let data = payload(777);
    let config = Config::builder().copy_buffer_size(16).build();
    let mut conn = TrickleReader::new(response(0, &data), 5);
    let mut task = DownloadTask::with_config(&config);

    assert_eq!(task.recv_buffer(&mut conn).unwrap(), data);
}

#[test]
fn test_recv_buffer_truncated_body() {
    let mut wire = response(0, &payload(100));
    wire.truncate(10 + 60);
    let mut conn = MockConn::new(wire);
    let mut task = DownloadTask::new();

    let err = task.recv_buffer(&mut conn).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        FdfsError::ShortRead {
            expected: 100,
            actual: 60
        }
    ));
    assert!(err.to_string().starts_with("DownloadTask::recv_buffer"));
}

#[test]
fn test_recv_buffer_server_error() {
    let mut conn = MockConn::new(response(2, b""));
    let mut task = DownloadTask::new();

    let err = task.recv_buffer(&mut conn).unwrap_err();
    assert_eq!(err.server_status(), Some(2));
}

#[test]
fn test_recv_buffer_short_header() {
    let mut conn = MockConn::new(vec![100, 0, 0]);
    let mut task = DownloadTask::new();

    let err = task.recv_buffer(&mut conn).unwrap_err();
    assert!(matches!(err.root_cause(), FdfsError::ShortRead { expected: 10, .. }));
}

// =============================================================================
// Receive into File
// =============================================================================

#[test]
fn test_recv_file() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.bin");
    let data = payload(200_000);

    let mut conn = MockConn::new(response(0, &data));
    let mut task = DownloadTask::new();
    let copied = task.recv_file(&mut conn, &dest).unwrap();

    assert_eq!(copied, 200_000);
    assert_eq!(fs::read(&dest).unwrap(), data);
}

#[test]
fn test_recv_file_truncates_existing() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out.txt");
    fs::write(&dest, b"old content that is much longer").unwrap();

    let mut conn = MockConn::new(response(0, b"new"));
    let mut task = DownloadTask::new();
    task.recv_file(&mut conn, &dest).unwrap();

    assert_eq!(fs::read(&dest).unwrap(), b"new");
}

#[test]
fn test_recv_file_server_error_leaves_destination_alone() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("missing.bin");

    let mut conn = MockConn::new(response(2, b""));
    let mut task = DownloadTask::new();
    let err = task.recv_file(&mut conn, &dest).unwrap_err();

    assert!(matches!(err.root_cause(), FdfsError::ServerError { status: 2 }));
    assert!(err.to_string().starts_with("DownloadTask::recv_file"));
    assert!(!dest.exists());
}

#[test]
fn test_recv_file_truncated_body() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("partial.bin");
    let mut wire = response(0, &payload(1000));
    wire.truncate(10 + 400);

    let mut conn = MockConn::new(wire);
    let mut task = DownloadTask::new();
    let err = task.recv_file(&mut conn, &dest).unwrap_err();

    assert!(matches!(
        err.root_cause(),
        FdfsError::ShortRead {
            expected: 1000,
            actual: 400
        }
    ));
}

#[test]
fn test_recv_file_bad_destination() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("no-such-dir").join("out.bin");

    let mut conn = MockConn::new(response(0, b"data"));
    let mut task = DownloadTask::new();
    let err = task.recv_file(&mut conn, &dest).unwrap_err();

    assert!(matches!(err.root_cause(), FdfsError::Io(_)));
}
