//! The pet list container.
//!
//! The site keeps one cached copy of the public pet collection. It has a
//! single writer (`refresh`); every page reads the same copy, which stays a
//! point-in-time snapshot until it goes stale or someone clicks Refresh.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use pet_haven_core::{Collection, Pet, PetId};

use crate::api::{ApiError, Client};

/// How long a fetched pet list stays fresh.
const PET_LIST_TTL: Duration = Duration::from_secs(300);

/// Search fields for the public pet list: name, species, breed.
fn search_fields(pet: &Pet) -> Vec<&str> {
    vec![&pet.name, &pet.species, &pet.breed]
}

struct PetStoreInner {
    pets: Collection<Pet>,
    fetched_at: Option<Instant>,
}

/// Cached copy of the public pet collection.
pub struct PetStore {
    inner: RwLock<PetStoreInner>,
}

impl Default for PetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PetStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(PetStoreInner {
                pets: Collection::new(),
                fetched_at: None,
            }),
        }
    }

    /// Re-fetch the collection from the backend when it is stale (or when
    /// `force` is set by the Refresh action). The single writer.
    ///
    /// # Errors
    ///
    /// Returns an error when a fetch was needed and failed; the previous
    /// copy is left untouched.
    pub async fn refresh(&self, api: &Client, force: bool) -> Result<(), ApiError> {
        {
            let inner = self.inner.read().await;
            let fresh = inner
                .fetched_at
                .is_some_and(|at| at.elapsed() < PET_LIST_TTL);
            if fresh && !force {
                return Ok(());
            }
        }

        let pets = api.all_pets().await?;

        let mut inner = self.inner.write().await;
        inner.pets.set_items(pets);
        inner.fetched_at = Some(Instant::now());
        Ok(())
    }

    /// Publicly visible pets matching a search query (name/species/breed,
    /// case-insensitive substring; empty query matches all). Reads whatever
    /// copy is present, stale or not.
    pub async fn browse(&self, query: &str) -> Vec<Pet> {
        let inner = self.inner.read().await;
        inner
            .pets
            .filter(query, search_fields)
            .into_iter()
            .filter(|pet| pet.is_visible())
            .cloned()
            .collect()
    }

    /// Look up a single pet by id from the cached copy.
    pub async fn get(&self, id: &PetId) -> Option<Pet> {
        let inner = self.inner.read().await;
        inner.pets.get(id.as_str()).cloned()
    }

    /// Pets from the cached copy matching a set of ids (favorites, adopted).
    pub async fn by_ids(&self, ids: &[PetId]) -> Vec<Pet> {
        let inner = self.inner.read().await;
        ids.iter()
            .filter_map(|id| inner.pets.get(id.as_str()).cloned())
            .collect()
    }

    /// The first `n` visible, adoptable pets (home page strip).
    pub async fn featured(&self, n: usize) -> Vec<Pet> {
        let inner = self.inner.read().await;
        inner
            .pets
            .items()
            .iter()
            .filter(|pet| pet.is_adoptable())
            .take(n)
            .cloned()
            .collect()
    }

    /// Whether a copy has ever been fetched.
    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.fetched_at.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pet_haven_core::PetStatus;

    fn pet(id: &str, name: &str, species: &str, breed: &str) -> Pet {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "name": name,
            "species": species,
            "breed": breed,
        }))
        .unwrap()
    }

    async fn seeded() -> PetStore {
        let store = PetStore::new();
        {
            let mut inner = store.inner.write().await;
            inner.pets.set_items(vec![
                pet("1", "Golden Retriever", "Dog", "Retriever"),
                pet("2", "Max", "Dog", "Golden"),
                pet("3", "Rex", "Dog", "Terrier"),
            ]);
            inner.fetched_at = Some(Instant::now());
        }
        store
    }

    #[tokio::test]
    async fn test_browse_filters_name_and_breed() {
        let store = seeded().await;
        let hits = store.browse("golden").await;
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Golden Retriever", "Max"]);
    }

    #[tokio::test]
    async fn test_browse_empty_query_returns_all_visible() {
        let store = seeded().await;
        assert_eq!(store.browse("").await.len(), 3);
    }

    #[tokio::test]
    async fn test_browse_hides_locked_pets() {
        let store = seeded().await;
        {
            let mut inner = store.inner.write().await;
            inner.pets.update("2", |p| p.is_locked = true);
        }
        let hits = store.browse("").await;
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.id.as_str() != "2"));
    }

    #[tokio::test]
    async fn test_featured_skips_non_adoptable() {
        let store = seeded().await;
        {
            let mut inner = store.inner.write().await;
            inner.pets.update("1", |p| p.status = PetStatus::Adopted);
        }
        let featured = store.featured(10).await;
        assert_eq!(featured.len(), 2);
    }

    #[tokio::test]
    async fn test_by_ids_preserves_order_and_skips_missing() {
        let store = seeded().await;
        let hits = store
            .by_ids(&[PetId::new("3"), PetId::new("missing"), PetId::new("1")])
            .await;
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
