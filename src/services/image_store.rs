use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};

use crate::error::ImageGenerationError;

/// On-disk home for generated images in stored mode.
///
/// Files are named `<unix-millis>-<seq>-<digest>.png`; the sequence number
/// disambiguates writes within the same millisecond and the content digest
/// disambiguates across process restarts.
pub struct ImageStore {
    dir: PathBuf,
    public_base_url: String,
    seq: AtomicU64,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    fn file_name(&self, bytes: &[u8]) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let digest = hex::encode(Sha256::digest(bytes));
        format!(
            "{}-{}-{}.png",
            chrono::Utc::now().timestamp_millis(),
            seq,
            &digest[..12]
        )
    }

    /// Write PNG bytes and return the public URL that serves them.
    pub async fn save_png(&self, bytes: &[u8]) -> Result<String, ImageGenerationError> {
        self.ensure_dir()
            .await
            .map_err(|e| ImageGenerationError::Storage(e.to_string()))?;

        let filename = self.file_name(bytes);
        let path = self.dir.join(&filename);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            log::error!("❌ Failed to write file {}: {}", path.display(), e);
            ImageGenerationError::Storage(e.to_string())
        })?;

        log::info!("💾 Image saved: {} ({} bytes)", path.display(), bytes.len());
        Ok(format!("{}/images/{}", self.public_base_url, filename))
    }

    /// Delete stored PNGs last modified more than `max_age` ago. Returns the
    /// number of files removed.
    pub async fn sweep(&self, max_age: Duration) -> std::io::Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();

            if age > max_age {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) => log::warn!("⚠️ Could not remove {}: {}", path.display(), e),
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine};
    use tempfile::TempDir;

    use crate::services::ai_service::mock::PNG_FIXTURE_BASE64;

    #[tokio::test]
    async fn test_saved_file_round_trips_fixture() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("generated_images"), "http://127.0.0.1:5000/");

        let bytes = general_purpose::STANDARD.decode(PNG_FIXTURE_BASE64).unwrap();
        let url = store.save_png(&bytes).await.unwrap();

        assert!(url.starts_with("http://127.0.0.1:5000/images/"));
        assert!(url.ends_with(".png"));

        let filename = url.rsplit('/').next().unwrap();
        let written = std::fs::read(store.dir().join(filename)).unwrap();
        assert_eq!(written, bytes);
        assert_eq!(general_purpose::STANDARD.encode(&written), PNG_FIXTURE_BASE64);
    }

    #[tokio::test]
    async fn test_same_payload_gets_distinct_names() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path(), "http://localhost");

        let first = store.save_png(b"same bytes").await.unwrap();
        let second = store.save_png(b"same bytes").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_pngs() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path(), "http://localhost");

        store.save_png(b"fresh").await.unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"keep me").unwrap();

        assert_eq!(store.sweep(Duration::from_secs(3600)).await.unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.sweep(Duration::from_millis(1)).await.unwrap(), 1);

        let remaining: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from("notes.txt")]);
    }

    #[tokio::test]
    async fn test_sweep_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = ImageStore::new(temp_dir.path().join("never-created"), "http://localhost");

        assert_eq!(store.sweep(Duration::from_secs(1)).await.unwrap(), 0);
    }
}
