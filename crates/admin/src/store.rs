//! The user directory container.
//!
//! The panel keeps one cached copy of the user collection. It has a single
//! writer path, and ban/unban go through it optimistically: the flag flips
//! in the copy immediately, and the pre-mutation snapshot comes back if the
//! backend declines.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::RwLock;

use pet_haven_core::{BanInfo, Collection, User, UserId};

use crate::api::{AdminApiError, AdminClient};

/// How long a fetched user list stays fresh.
const USER_LIST_TTL: Duration = Duration::from_secs(120);

/// Search fields for the user directory: name, email.
fn search_fields(user: &User) -> Vec<&str> {
    vec![&user.name, user.email.as_str()]
}

struct DirectoryInner {
    users: Collection<User>,
    fetched_at: Option<Instant>,
}

/// Cached copy of the user collection.
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(DirectoryInner {
                users: Collection::new(),
                fetched_at: None,
            }),
        }
    }

    /// Re-fetch the collection when stale (or on the explicit Refresh
    /// action). The single writer for wholesale replacement.
    ///
    /// # Errors
    ///
    /// Returns an error when a fetch was needed and failed; the previous
    /// copy is left untouched.
    pub async fn refresh(
        &self,
        api: &AdminClient,
        token: &str,
        force: bool,
    ) -> Result<(), AdminApiError> {
        {
            let inner = self.inner.read().await;
            let fresh = inner
                .fetched_at
                .is_some_and(|at| at.elapsed() < USER_LIST_TTL);
            if fresh && !force {
                return Ok(());
            }
        }

        let users = api.users(token).await?;

        let mut inner = self.inner.write().await;
        inner.users.set_items(users);
        inner.fetched_at = Some(Instant::now());
        Ok(())
    }

    /// Users matching a name/email substring search (empty query matches
    /// all), from whatever copy is present.
    pub async fn search(&self, query: &str) -> Vec<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .filter(query, search_fields)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Number of users in the cached copy.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Whether the cached copy is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.users.is_empty()
    }

    /// Ban a user, optimistically.
    ///
    /// The ban flag and reason are applied to the cached copy before the
    /// network call; if the backend declines, the copy rolls back to the
    /// pre-mutation snapshot and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the backend error after rolling back.
    pub async fn ban(
        &self,
        api: &AdminClient,
        token: &str,
        id: &UserId,
        reason: Option<&str>,
    ) -> Result<(), AdminApiError> {
        let snapshot = {
            let mut inner = self.inner.write().await;
            let snapshot = inner.users.snapshot();
            inner.users.update(id.as_str(), |user| {
                user.ban_info = BanInfo {
                    is_banned: true,
                    reason: reason.map(ToOwned::to_owned),
                    banned_at: Some(Utc::now()),
                };
            });
            snapshot
        };

        match api.ban_user(token, id, reason).await {
            Ok(updated) => {
                if let Some(user) = updated {
                    self.inner.write().await.users.replace(user);
                }
                Ok(())
            }
            Err(e) => {
                self.inner.write().await.users.restore(snapshot);
                Err(e)
            }
        }
    }

    /// Lift a user's ban, optimistically, with the same rollback contract
    /// as [`Self::ban`].
    ///
    /// # Errors
    ///
    /// Returns the backend error after rolling back.
    pub async fn unban(
        &self,
        api: &AdminClient,
        token: &str,
        id: &UserId,
    ) -> Result<(), AdminApiError> {
        let snapshot = {
            let mut inner = self.inner.write().await;
            let snapshot = inner.users.snapshot();
            inner.users.update(id.as_str(), |user| {
                user.ban_info = BanInfo::default();
            });
            snapshot
        };

        match api.unban_user(token, id).await {
            Ok(updated) => {
                if let Some(user) = updated {
                    self.inner.write().await.users.replace(user);
                }
                Ok(())
            }
            Err(e) => {
                self.inner.write().await.users.restore(snapshot);
                Err(e)
            }
        }
    }

    /// Delete a user. Not optimistic: the record leaves the copy only after
    /// the backend confirms, and exactly one record goes.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the copy is untouched on failure.
    pub async fn delete(
        &self,
        api: &AdminClient,
        token: &str,
        id: &UserId,
    ) -> Result<(), AdminApiError> {
        api.delete_user(token, id).await?;
        self.inner.write().await.users.remove(id.as_str());
        Ok(())
    }
}
