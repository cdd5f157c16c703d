//! Client-side collection handling shared by every list page.
//!
//! Each list page in the frontends follows the same contract: fetch a
//! collection from the backend, keep a point-in-time copy, narrow it with a
//! case-insensitive substring search, and splice mutated records back in by
//! id (or roll the whole copy back when an optimistic mutation fails).
//! This module is that contract, written once.

/// Anything addressable by its backend string id.
pub trait Keyed {
    /// The record's id.
    fn key(&self) -> &str;
}

/// An immutable copy of a collection, taken before an optimistic mutation.
#[derive(Debug, Clone)]
pub struct Snapshot<T>(Vec<T>);

/// A point-in-time copy of a backend collection.
///
/// The collection itself never talks to the network; callers fetch, then
/// hand the records over, then apply whatever the backend confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Keyed + Clone> Collection<T> {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a collection from fetched records.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    /// All records, in fetch order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Narrow the collection with a case-insensitive substring search.
    ///
    /// A record matches when `query` occurs in any of the strings `fields`
    /// yields for it. The empty query matches everything, so `filter("",..)`
    /// returns the collection unchanged.
    pub fn filter<'a, F>(&'a self, query: &str, fields: F) -> Vec<&'a T>
    where
        F: Fn(&'a T) -> Vec<&'a str>,
    {
        if query.is_empty() {
            return self.items.iter().collect();
        }

        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                fields(item)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Splice a mutated record back in by id, leaving every other record
    /// untouched. Returns false when no record has that id.
    pub fn replace(&mut self, updated: T) -> bool {
        match self.items.iter_mut().find(|item| item.key() == updated.key()) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Mutate the matching record in place. Returns false when no record
    /// has that id.
    pub fn update<F>(&mut self, key: &str, mutate: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(item) => {
                mutate(item);
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given id. At most one record is removed.
    pub fn remove(&mut self, key: &str) -> Option<T> {
        let index = self.items.iter().position(|item| item.key() == key)?;
        Some(self.items.remove(index))
    }

    /// Capture the current records ahead of an optimistic mutation.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot(self.items.clone())
    }

    /// Roll back to a previously captured snapshot.
    pub fn restore(&mut self, snapshot: Snapshot<T>) {
        self.items = snapshot.0;
    }
}

impl<T: Keyed + Clone> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_items(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Record {
        id: String,
        name: String,
        breed: String,
        banned: bool,
    }

    impl Keyed for Record {
        fn key(&self) -> &str {
            &self.id
        }
    }

    fn record(id: &str, name: &str, breed: &str) -> Record {
        Record {
            id: id.to_owned(),
            name: name.to_owned(),
            breed: breed.to_owned(),
            banned: false,
        }
    }

    fn sample() -> Collection<Record> {
        Collection::from_items(vec![
            record("1", "Golden Retriever", ""),
            record("2", "Max", "Golden"),
            record("3", "Rex", "Terrier"),
        ])
    }

    #[test]
    fn test_filter_case_insensitive_substring() {
        let pets = sample();
        let hits = pets.filter("golden", |p| vec![&p.name, &p.breed]);
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Golden Retriever", "Max"]);
    }

    #[test]
    fn test_filter_empty_query_is_identity() {
        let pets = sample();
        let hits = pets.filter("", |p| vec![&p.name, &p.breed]);
        assert_eq!(hits.len(), pets.len());
    }

    #[test]
    fn test_filter_no_match() {
        let pets = sample();
        let hits = pets.filter("siamese", |p| vec![&p.name, &p.breed]);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_filter_only_searches_configured_fields() {
        let pets = sample();
        // "terrier" only appears in breed; searching name alone misses it
        let hits = pets.filter("terrier", |p| vec![p.name.as_str()]);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_update_flips_exactly_one_record() {
        let mut users = sample();
        assert!(users.update("2", |u| u.banned = true));

        assert!(users.get("2").unwrap().banned);
        assert!(!users.get("1").unwrap().banned);
        assert!(!users.get("3").unwrap().banned);
    }

    #[test]
    fn test_update_unknown_key_is_noop() {
        let mut users = sample();
        let before = users.clone();
        assert!(!users.update("missing", |u| u.banned = true));
        assert_eq!(users, before);
    }

    #[test]
    fn test_snapshot_restore_rolls_back_optimistic_mutation() {
        let mut users = sample();
        let snapshot = users.snapshot();

        users.update("2", |u| u.banned = true);
        assert!(users.get("2").unwrap().banned);

        // the network call failed; roll back
        users.restore(snapshot);
        assert!(!users.get("2").unwrap().banned);
        assert_eq!(users, sample());
    }

    #[test]
    fn test_replace_splices_by_id() {
        let mut apps = Collection::from_items(vec![
            record("V1", "Sunny Paws", "Pending"),
            record("V2", "Happy Tails", "Approved"),
        ]);

        let approved = record("V1", "Sunny Paws", "Approved");
        assert!(apps.replace(approved));

        assert_eq!(apps.get("V1").unwrap().breed, "Approved");
        assert_eq!(apps.get("V2").unwrap().breed, "Approved");
        assert_eq!(apps.len(), 2);
    }

    #[test]
    fn test_replace_unknown_id_returns_false() {
        let mut apps = sample();
        assert!(!apps.replace(record("V9", "Ghost", "")));
        assert_eq!(apps.len(), 3);
    }

    #[test]
    fn test_remove_exactly_one() {
        let mut pets = sample();
        let removed = pets.remove("2").unwrap();
        assert_eq!(removed.name, "Max");
        assert_eq!(pets.len(), 2);
        assert!(pets.get("2").is_none());
        assert!(pets.get("1").is_some());
        assert!(pets.get("3").is_some());
    }

    #[test]
    fn test_remove_missing_returns_none() {
        let mut pets = sample();
        assert!(pets.remove("missing").is_none());
        assert_eq!(pets.len(), 3);
    }
}
