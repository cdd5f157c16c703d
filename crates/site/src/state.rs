//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::Client;
use crate::config::SiteConfig;
use crate::services::images::ImageUploader;
use crate::store::PetStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the backend client, the image
/// uploader, and the cached pet collection.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    api: Client,
    uploader: ImageUploader,
    pets: PetStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        let api = Client::new(&config.backend);
        let uploader = ImageUploader::new(&config.uploads);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                uploader,
                pets: PetStore::new(),
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the adoption backend client.
    #[must_use]
    pub fn api(&self) -> &Client {
        &self.inner.api
    }

    /// Get a reference to the image uploader.
    #[must_use]
    pub fn uploader(&self) -> &ImageUploader {
        &self.inner.uploader
    }

    /// Get a reference to the cached pet collection.
    #[must_use]
    pub fn pets(&self) -> &PetStore {
        &self.inner.pets
    }
}
