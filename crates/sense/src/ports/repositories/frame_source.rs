//! Frame Source Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Frame};

/// Source of the current camera frame
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Read the current frame.
    ///
    /// Implementations wait out a capture process that is still writing;
    /// any other failure is returned as is.
    async fn read_frame(&self) -> Result<Frame, DomainError>;
}
