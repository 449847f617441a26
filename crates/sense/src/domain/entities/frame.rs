//! Frame - the most recent camera still
//!
//! Only the current content matters; frames are re-read every iteration.

use base64::{engine::general_purpose, Engine as _};

/// A captured JPEG frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard (padded) base64 of the frame
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Inline data URI suitable for an `image_url` content part
    pub fn data_uri(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.to_base64())
    }
}

impl From<Vec<u8>> for Frame {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri() {
        let frame = Frame::new(b"jpeg".to_vec());
        assert_eq!(frame.to_base64(), "anBlZw==");
        assert_eq!(frame.data_uri(), "data:image/jpeg;base64,anBlZw==");
    }
}
