//! Server state and configuration.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::background::{DecodedBackground, ImageSource};
use crate::error::StencilError;

/// How long a fetched background stays cached without being used.
pub const BACKGROUND_EXPIRATION_SECS: u64 = 600;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

struct CachedBackground {
    background: DecodedBackground,
    last_accessed: Instant,
}

/// Wraps another source and keeps decoded backgrounds around, keyed by URL.
pub struct CachedImageSource {
    inner: Arc<dyn ImageSource>,
    entries: RwLock<HashMap<String, CachedBackground>>,
}

impl CachedImageSource {
    pub fn new(inner: Arc<dyn ImageSource>) -> Self {
        Self {
            inner,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drop entries idle for longer than `expiration`. Returns how many went.
    pub async fn evict_idle(&self, expiration: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, v| now.duration_since(v.last_accessed) < expiration);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl ImageSource for CachedImageSource {
    async fn fetch(&self, url: &str) -> Result<DecodedBackground, StencilError> {
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(url) {
                entry.last_accessed = Instant::now();
                return Ok(entry.background.clone());
            }
        }

        let background = self.inner.fetch(url).await?;

        self.entries.write().await.insert(
            url.to_string(),
            CachedBackground {
                background: background.clone(),
                last_accessed: Instant::now(),
            },
        );
        Ok(background)
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub backgrounds: CachedImageSource,
}

impl AppState {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            backgrounds: CachedImageSource::new(source),
        }
    }
}
