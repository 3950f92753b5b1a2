//! Write-once cache of detector replies.
//!
//! Every detection call is a billed request, so each reply is persisted to
//! `outputs/<detector dir>/<version>/ai_detection_NNN.json`. A file at that path
//! is authoritative: it is loaded as-is and the detector is not called. There
//! is no hashing, no staleness check and no locking; one process is assumed
//! to own the directory.

use crate::config::VariantKey;
use crate::detection::{Detector, Reply};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// File-backed reply cache rooted at the outputs directory
pub struct ResultCache {
    root: PathBuf,
}

impl ResultCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic artifact path for (detector, article, version)
    pub fn path_for(&self, cache_dir: &str, key: VariantKey) -> PathBuf {
        self.root
            .join(cache_dir)
            .join(key.version.to_string())
            .join(format!("ai_detection_{:03}.json", key.article_id))
    }

    /// Load a cached reply if the artifact exists.
    ///
    /// A present but unreadable or non-JSON file is an error.
    pub fn load(&self, cache_dir: &str, key: VariantKey) -> Result<Option<Reply>> {
        let path = self.path_for(cache_dir, key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(Some(Reply::from_json(value)))
    }

    /// Persist a reply, creating parent directories as needed
    pub fn store(&self, cache_dir: &str, key: VariantKey, reply: &Reply) -> Result<PathBuf> {
        let path = self.path_for(cache_dir, key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&reply.to_json())?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Return the cached reply, or call the detector and cache its reply.
    pub async fn fetch<D: Detector>(
        &self,
        detector: &D,
        key: VariantKey,
        text: &str,
    ) -> Result<Reply> {
        if let Some(reply) = self.load(detector.cache_dir(), key)? {
            info!(
                detector = detector.name(),
                article_id = key.article_id,
                version = %key.version,
                "Response exists, skipping request"
            );
            return Ok(reply);
        }

        info!(
            detector = detector.name(),
            article_id = key.article_id,
            version = %key.version,
            "Running detection"
        );
        let reply = detector.detect(text).await?;
        let path = self.store(detector.cache_dir(), key, &reply)?;
        info!(detector = detector.name(), path = %path.display(), "Saved response");

        Ok(reply)
    }
}
