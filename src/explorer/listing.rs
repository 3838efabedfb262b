use std::cmp::Ordering;

use crate::models::{Entry, EntryKey};
use crate::storage::RemotePath;

/// The entries shown for one directory and filter, already filtered and
/// sorted. Rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub path: RemotePath,
    pub filter: String,
    pub entries: Vec<Entry>,
}

impl Listing {
    pub fn build(path: RemotePath, filter: &str, raw: Vec<Entry>) -> Self {
        let mut entries = filter_entries(raw, filter);
        sort_entries(&mut entries);
        Self {
            path,
            filter: filter.to_string(),
            entries,
        }
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_dir == key.is_dir && e.name == key.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keeps entries whose name contains `filter`, ignoring case. An empty
/// filter keeps everything.
pub fn filter_entries(entries: Vec<Entry>, filter: &str) -> Vec<Entry> {
    if filter.is_empty() {
        return entries;
    }
    let needle = filter.to_lowercase();
    entries
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}

/// Directories first, then by name.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(&a.name, &b.name),
    });
}

/// Case-insensitive order with lowercase ahead of uppercase on ties, which
/// is how a browser's locale comparison orders plain names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Tags listing requests so that only the newest one may replace the
/// cached listing.
#[derive(Debug, Default)]
pub struct ListingCache {
    listing: Listing,
    last_issued: u64,
    in_flight: Option<PendingList>,
}

#[derive(Debug, Clone)]
struct PendingList {
    request_id: u64,
    path: RemotePath,
    filter: String,
}

impl ListingCache {
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Registers a new request, superseding any older one still in flight.
    pub fn issue(&mut self, path: RemotePath, filter: &str) -> u64 {
        self.last_issued += 1;
        self.in_flight = Some(PendingList {
            request_id: self.last_issued,
            path,
            filter: filter.to_string(),
        });
        self.last_issued
    }

    /// Applies the result of request `request_id`. Returns `false` when the
    /// request was superseded and its result dropped.
    pub fn accept(&mut self, request_id: u64, raw: Vec<Entry>) -> bool {
        match self.take_current(request_id) {
            Some(pending) => {
                self.listing = Listing::build(pending.path, &pending.filter, raw);
                true
            }
            None => false,
        }
    }

    /// Handles a failed request. The shown listing stays unless it belongs
    /// to another directory, in which case an empty listing for the
    /// requested directory replaces it.
    pub fn reject(&mut self, request_id: u64) -> bool {
        match self.take_current(request_id) {
            Some(pending) => {
                if pending.path != self.listing.path {
                    self.listing = Listing {
                        path: pending.path,
                        filter: pending.filter,
                        entries: Vec::new(),
                    };
                }
                true
            }
            None => false,
        }
    }

    fn take_current(&mut self, request_id: u64) -> Option<PendingList> {
        match &self.in_flight {
            Some(pending) if pending.request_id == request_id => self.in_flight.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry::file("notes.txt", 10),
            Entry::dir("docs"),
            Entry::file("Archive.zip", 20),
            Entry::dir("Music"),
            Entry::file("b.txt", 1),
            Entry::dir("archive"),
        ]
    }

    #[test]
    fn directories_precede_files_and_names_are_ordered() {
        let listing = Listing::build(RemotePath::root(), "", sample());
        assert_eq!(
            names(&listing.entries),
            ["archive", "docs", "Music", "Archive.zip", "b.txt", "notes.txt"]
        );

        let first_file = listing.entries.iter().position(|e| !e.is_dir).expect("files");
        assert!(listing.entries[..first_file].iter().all(|e| e.is_dir));
        assert!(listing.entries[first_file..].iter().all(|e| !e.is_dir));
        for pair in listing.entries.windows(2) {
            if pair[0].is_dir == pair[1].is_dir {
                assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
            }
        }
    }

    #[test]
    fn root_scenario_renders_directory_first() {
        let listing = Listing::build(
            RemotePath::root(),
            "",
            vec![Entry::file("notes.txt", 3), Entry::dir("docs")],
        );
        assert_eq!(names(&listing.entries), ["docs", "notes.txt"]);
    }

    #[test]
    fn name_ties_put_lowercase_first() {
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("A", "b"), Ordering::Less);
        assert_eq!(compare_names("same", "same"), Ordering::Equal);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let filtered = filter_entries(sample(), "ARCH");
        assert_eq!(names(&filtered), ["Archive.zip", "archive"]);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        assert_eq!(filter_entries(sample(), ""), sample());
    }

    #[test]
    fn filter_is_idempotent() {
        for needle in ["", "a", "TXT", "zzz"] {
            let once = filter_entries(sample(), needle);
            let twice = filter_entries(once.clone(), needle);
            assert_eq!(once, twice);
            assert!(once
                .iter()
                .all(|e| e.name.to_lowercase().contains(&needle.to_lowercase())));
        }
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut cache = ListingCache::default();
        let first = cache.issue(RemotePath::root(), "a");
        let second = cache.issue(RemotePath::root(), "b");

        assert!(cache.accept(second, vec![Entry::file("b.txt", 1)]));
        assert!(!cache.accept(first, vec![Entry::file("a.txt", 1)]));

        assert_eq!(names(&cache.listing().entries), ["b.txt"]);
        assert_eq!(cache.listing().filter, "b");
        assert!(!cache.is_loading());
    }

    #[test]
    fn failed_refresh_keeps_listing_of_same_directory() {
        let mut cache = ListingCache::default();
        let id = cache.issue(RemotePath::root(), "");
        cache.accept(id, vec![Entry::dir("docs")]);

        let id = cache.issue(RemotePath::root(), "");
        assert!(cache.reject(id));
        assert_eq!(names(&cache.listing().entries), ["docs"]);
    }

    #[test]
    fn failed_refresh_of_other_directory_clears_view() {
        let mut cache = ListingCache::default();
        let id = cache.issue(RemotePath::root(), "");
        cache.accept(id, vec![Entry::dir("docs")]);

        let docs = RemotePath::parse("docs").expect("path");
        let id = cache.issue(docs.clone(), "");
        assert!(cache.reject(id));
        assert_eq!(cache.listing().path, docs);
        assert!(cache.listing().is_empty());
    }
}
