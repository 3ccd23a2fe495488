//! Subscription source registry
//!
//! Static sources come from the configuration and never change at runtime.
//! Dynamic sources live in a JSON file (`{"urls": [...]}`) that the API
//! mutates and that is re-read periodically, so edits made by hand are picked
//! up too.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("subscription file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid subscription file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("subscription URL must not be empty")]
    EmptyUrl,
}

/// On-disk shape of the dynamic list
#[derive(Debug, Default, Serialize, Deserialize)]
struct DynamicSubscribe {
    #[serde(default)]
    urls: Vec<String>,
}

#[derive(Debug)]
pub struct SubscriptionRegistry {
    path: PathBuf,
    static_urls: Vec<String>,
    /// Held for a whole mutation or reload, file I/O included, so the file
    /// and the in-memory list change together.
    writer: Mutex<()>,
    /// Write-locked only to swap in a new list; readers never wait on I/O.
    dynamic_urls: RwLock<Vec<String>>,
}

impl SubscriptionRegistry {
    /// Open the registry backed by `path`, creating an empty file if missing
    pub fn open(path: impl AsRef<Path>, static_urls: Vec<String>) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            write_file(&path, &[])?;
            info!("Created empty subscription file {}", path.display());
        }

        let dynamic_urls = read_file(&path)?;
        Ok(Self {
            path,
            static_urls,
            writer: Mutex::new(()),
            dynamic_urls: RwLock::new(dynamic_urls),
        })
    }

    /// Replace the dynamic list with the current file content
    pub fn reload(&self) -> Result<(), RegistryError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let urls = read_file(&self.path)?;
        self.replace(urls);
        Ok(())
    }

    /// Add a dynamic source; returns `false` if it was already registered
    ///
    /// Blocks on file I/O; async callers should run it on a blocking thread.
    pub fn add(&self, url: &str) -> Result<bool, RegistryError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RegistryError::EmptyUrl);
        }

        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut updated = self.dynamic_snapshot();
        if updated.iter().any(|existing| existing == url) {
            return Ok(false);
        }

        updated.push(url.to_string());
        write_file(&self.path, &updated)?;
        self.replace(updated);
        Ok(true)
    }

    /// Remove a dynamic source; returns whether anything was removed
    ///
    /// Blocks on file I/O like [`add`](Self::add).
    pub fn remove(&self, url: &str) -> Result<bool, RegistryError> {
        let url = url.trim();
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.dynamic_snapshot();
        let updated: Vec<String> = current
            .iter()
            .filter(|existing| existing.as_str() != url)
            .cloned()
            .collect();
        let removed = updated.len() != current.len();

        write_file(&self.path, &updated)?;
        self.replace(updated);
        Ok(removed)
    }

    fn dynamic_snapshot(&self) -> Vec<String> {
        self.dynamic_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, urls: Vec<String>) {
        *self
            .dynamic_urls
            .write()
            .unwrap_or_else(PoisonError::into_inner) = urls;
    }

    /// Static sources followed by dynamic ones
    pub fn list(&self) -> Vec<String> {
        let guard = self
            .dynamic_urls
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut urls = Vec::with_capacity(self.static_urls.len() + guard.len());
        urls.extend(self.static_urls.iter().cloned());
        urls.extend(guard.iter().cloned());
        urls
    }

    /// Reload the file every `interval` in the background
    ///
    /// A failed reload keeps the previous list.
    pub fn spawn_reload(registry: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the file was just read.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let registry = Arc::clone(&registry);
                match tokio::task::spawn_blocking(move || registry.reload()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error!("Failed to reload subscription file: {}", e),
                    Err(e) => error!("Subscription reload task failed: {}", e),
                }
            }
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<String>, RegistryError> {
    let data = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sub: DynamicSubscribe = serde_json::from_str(&data)?;
    Ok(sub.urls)
}

fn write_file(path: &Path, urls: &[String]) -> Result<(), RegistryError> {
    let sub = DynamicSubscribe {
        urls: urls.to_vec(),
    };
    let data = serde_json::to_string_pretty(&sub)?;
    fs::write(path, data).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
