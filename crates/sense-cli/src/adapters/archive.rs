//! Filesystem narration archive
//!
//! Every utterance gets its own directory named by a random URL-safe id:
//! `{root}/{id}/audio.wav`. Nothing is ever cleaned up.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use std::path::PathBuf;
use tracing::debug;

use sense::{DomainError, NarrationArchive, SynthesizedAudio};

const ID_BYTES: usize = 30;
const AUDIO_FILE: &str = "audio.wav";

/// Random, filesystem-safe utterance id (URL-safe base64, no padding)
pub fn utterance_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// NarrationArchive rooted at a local directory
pub struct FsNarrationArchive {
    root: PathBuf,
}

impl FsNarrationArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl NarrationArchive for FsNarrationArchive {
    async fn store(&self, audio: &SynthesizedAudio) -> Result<PathBuf, DomainError> {
        let dir = self.root.join(utterance_id());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(AUDIO_FILE);
        tokio::fs::write(&path, &audio.bytes).await?;

        debug!(path = ?path, bytes = audio.bytes.len(), "Narration archived");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_is_url_safe_and_unpadded() {
        let id = utterance_id();
        // 30 bytes -> 40 base64 chars, no padding needed
        assert_eq!(id.len(), 40);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..100).map(|_| utterance_id()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn test_store_creates_new_directory_per_utterance() {
        let root = tempfile::tempdir().unwrap();
        let archive = FsNarrationArchive::new(root.path().join("narration"));
        let audio = SynthesizedAudio::new(vec![1, 2, 3]);

        let first = archive.store(&audio).await.unwrap();
        let second = archive.store(&audio).await.unwrap();

        assert_ne!(first.parent(), second.parent());
        assert_eq!(first.file_name().unwrap(), "audio.wav");
        assert_eq!(std::fs::read(&first).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            std::fs::read_dir(root.path().join("narration"))
                .unwrap()
                .count(),
            2
        );
    }
}
