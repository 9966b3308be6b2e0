//! Background image loading.
//!
//! [`ImageSource`] abstracts where background bytes come from so the editor
//! host stays unaware of HTTP. [`HttpImageSource`] downloads with `reqwest`;
//! [`StaticImageSource`] serves pre-decoded images (CLI, tests).

use async_trait::async_trait;
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StencilError;
use crate::geometry::Size;

/// A decoded background image together with the URL it was loaded from.
#[derive(Debug, Clone)]
pub struct DecodedBackground {
    url: String,
    image: Arc<DynamicImage>,
}

impl DecodedBackground {
    pub fn new(url: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            url: url.into(),
            image: Arc::new(image),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Natural (unscaled) pixel size.
    pub fn size(&self) -> Size {
        Size::new(self.image.width() as f64, self.image.height() as f64)
    }
}

/// Something that can turn a background URL into a decoded image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<DecodedBackground, StencilError>;
}

/// Downloads backgrounds over HTTP(S).
///
/// Backgrounds are commonly hosted on a storage origin different from the
/// application; no same-origin restriction is applied.
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new() -> Result<Self, StencilError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stencil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StencilError::Image(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<DecodedBackground, StencilError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StencilError::Image(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(StencilError::Image(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StencilError::Image(format!("Failed to read image data: {}", e)))?;

        decode(url, &bytes)
    }
}

/// Decode raw image bytes into a background.
pub fn decode(url: &str, bytes: &[u8]) -> Result<DecodedBackground, StencilError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| StencilError::Image(format!("Failed to decode image: {}", e)))?;
    Ok(DecodedBackground::new(url, image))
}

/// Serves images registered ahead of time, keyed by URL.
#[derive(Default, Clone)]
pub struct StaticImageSource {
    images: HashMap<String, Arc<DynamicImage>>,
}

impl StaticImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, image: DynamicImage) {
        self.images.insert(url.into(), Arc::new(image));
    }

    pub fn with(mut self, url: impl Into<String>, image: DynamicImage) -> Self {
        self.insert(url, image);
        self
    }

    /// Synchronous lookup, for callers outside an async context.
    pub fn get(&self, url: &str) -> Result<DecodedBackground, StencilError> {
        self.images
            .get(url)
            .map(|image| DecodedBackground {
                url: url.to_string(),
                image: image.clone(),
            })
            .ok_or_else(|| StencilError::Image(format!("No image registered for {}", url)))
    }
}

#[async_trait]
impl ImageSource for StaticImageSource {
    async fn fetch(&self, url: &str) -> Result<DecodedBackground, StencilError> {
        self.get(url)
    }
}
