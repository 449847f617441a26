//! Frame file reader
//!
//! The capture process overwrites the frame in place. While it holds the
//! file, reads fail with a lock/permission error; those are retried after a
//! short fixed delay. Anything else fails immediately.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use sense::{DomainError, Frame, FrameSource};

const LOCK_RETRY_DELAY: Duration = Duration::from_millis(100);

/// FrameSource backed by a single file on disk
pub struct FileFrameSource {
    path: PathBuf,
    retry_delay: Duration,
    max_retries: Option<u32>,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry_delay: LOCK_RETRY_DELAY,
            max_retries: None,
        }
    }

    /// Cap the number of lock retries (unbounded by default)
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay between lock retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

/// Whether `err` means another process is still writing the file
fn is_transient_lock(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32) | Some(33))
}

#[async_trait]
impl FrameSource for FileFrameSource {
    async fn read_frame(&self) -> Result<Frame, DomainError> {
        let mut retries: u32 = 0;
        loop {
            match tokio::fs::read(&self.path).await {
                Ok(bytes) => return Ok(Frame::new(bytes)),
                Err(e) if is_transient_lock(&e) => {
                    if self.max_retries.is_some_and(|max| retries >= max) {
                        return Err(DomainError::Io(e));
                    }
                    retries += 1;
                    debug!(path = ?self.path, retries, "Frame locked, retrying");
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(DomainError::Io(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_are_identical_on_unchanged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();

        let source = FileFrameSource::new(&path);
        let first = source.read_frame().await.unwrap();
        let second = source.read_frame().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.bytes(), &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
    }

    #[tokio::test]
    async fn test_missing_file_fails_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileFrameSource::new(dir.path().join("absent.jpg"));

        let err = source.read_frame().await.unwrap_err();
        match err {
            DomainError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    /// Make `path` unreadable; `false` when permissions are not enforced (root)
    #[cfg(unix)]
    fn lock(path: &std::path::Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)).unwrap();
        std::fs::read(path).is_err()
    }

    #[cfg(unix)]
    fn unlock(path: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capped_retries_return_last_lock_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        std::fs::write(&path, [1, 2, 3]).unwrap();
        if !lock(&path) {
            return;
        }

        let source = FileFrameSource::new(&path)
            .with_retry_delay(Duration::from_millis(5))
            .with_max_retries(Some(3));
        let err = source.read_frame().await.unwrap_err();

        unlock(&path);
        match err {
            DomainError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unbounded_retries_recover_when_lock_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        std::fs::write(&path, [1, 2, 3]).unwrap();
        if !lock(&path) {
            return;
        }

        let writer_path = path.clone();
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            unlock(&writer_path);
        });

        let source = FileFrameSource::new(&path).with_retry_delay(Duration::from_millis(5));
        let frame = source.read_frame().await.unwrap();

        writer.await.unwrap();
        assert_eq!(frame.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_lock_classification() {
        assert!(is_transient_lock(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
        assert!(!is_transient_lock(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_transient_lock(&io::Error::from(
            io::ErrorKind::InvalidData
        )));
    }
}
