//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::AdminClient;
use crate::config::AdminConfig;
use crate::services::images::ImageUploader;
use crate::store::UserDirectory;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`: configuration, the moderation client, the
/// image uploader, and the cached user directory.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: AdminClient,
    uploader: ImageUploader,
    users: UserDirectory,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = AdminClient::new(&config.backend);
        let uploader = ImageUploader::new(&config.uploads);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                uploader,
                users: UserDirectory::new(),
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the moderation client.
    #[must_use]
    pub fn api(&self) -> &AdminClient {
        &self.inner.api
    }

    /// Get a reference to the image uploader.
    #[must_use]
    pub fn uploader(&self) -> &ImageUploader {
        &self.inner.uploader
    }

    /// Get a reference to the cached user directory.
    #[must_use]
    pub fn users(&self) -> &UserDirectory {
        &self.inner.users
    }
}
