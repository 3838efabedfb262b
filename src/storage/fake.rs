//! In-memory storage for tests.
//!
//! Holds a directory tree keyed by `userPath`, records every call, and can
//! be told to fail specific operations.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use super::{RemotePath, StorageApi};
use crate::error::StorageError;
use crate::models::Entry;

/// A recorded storage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(String),
    CreateDirectory(String, String),
    DeleteFiles(String, Vec<String>),
    DeleteDirectory(String, String, bool),
    Rename(String, String, String),
    Upload(String, String),
}

#[derive(Debug, Default)]
pub struct FakeStorage {
    tree: Mutex<BTreeMap<String, Vec<Entry>>>,
    calls: Mutex<Vec<Call>>,
    list_failures: Mutex<HashMap<String, StorageError>>,
    directory_failures: Mutex<HashMap<String, StorageError>>,
    upload_failure: Mutex<Option<StorageError>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        let storage = Self::default();
        storage.lock_tree().insert(String::new(), Vec::new());
        storage
    }

    /// Adds `entry` under `dir` (a `userPath` string); directories get an
    /// empty child listing of their own.
    pub fn with(self, dir: &str, entry: Entry) -> Self {
        {
            let mut tree = self.lock_tree();
            if entry.is_dir {
                tree.entry(join(dir, &entry.name)).or_default();
            }
            tree.entry(dir.to_string()).or_default().push(entry);
        }
        self
    }

    pub fn fail_list(&self, dir: &str, err: StorageError) {
        lock(&self.list_failures).insert(dir.to_string(), err);
    }

    pub fn fail_delete_directory(&self, name: &str, err: StorageError) {
        lock(&self.directory_failures).insert(name.to_string(), err);
    }

    pub fn fail_upload(&self, err: StorageError) {
        *lock(&self.upload_failure) = Some(err);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Calls other than listings, i.e. everything that changes storage.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List(_)))
            .collect()
    }

    pub fn names(&self, dir: &str) -> Vec<String> {
        self.lock_tree()
            .get(dir)
            .map(|entries| entries.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn lock_tree(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<Entry>>> {
        lock(&self.tree)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

impl StorageApi for FakeStorage {
    async fn list(&self, path: &RemotePath) -> Result<Vec<Entry>, StorageError> {
        let key = path.as_query();
        self.record(Call::List(key.clone()));
        if let Some(err) = lock(&self.list_failures).get(&key) {
            return Err(err.clone());
        }
        self.lock_tree()
            .get(&key)
            .cloned()
            .ok_or(StorageError::Unknown {
                status: 404,
                body: format!("{key} not found"),
            })
    }

    async fn create_directory(&self, path: &RemotePath, name: &str) -> Result<(), StorageError> {
        let dir = path.as_query();
        self.record(Call::CreateDirectory(dir.clone(), name.to_string()));
        let mut tree = self.lock_tree();
        let siblings = tree.entry(dir.clone()).or_default();
        if siblings.iter().any(|e| e.name == name) {
            return Err(StorageError::NameConflict("This name is already in use".into()));
        }
        siblings.push(Entry::dir(name));
        tree.insert(join(&dir, name), Vec::new());
        Ok(())
    }

    async fn delete_files(&self, path: &RemotePath, names: &[String]) -> Result<(), StorageError> {
        let dir = path.as_query();
        self.record(Call::DeleteFiles(dir.clone(), names.to_vec()));
        let mut tree = self.lock_tree();
        let siblings = tree.entry(dir).or_default();
        let missing: Vec<&String> = names
            .iter()
            .filter(|n| !siblings.iter().any(|e| !e.is_dir && &e.name == *n))
            .collect();
        siblings.retain(|e| e.is_dir || !names.contains(&e.name));
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorageError::PartialFailure(format!("Not found: {missing:?}")))
        }
    }

    async fn delete_directory(
        &self,
        path: &RemotePath,
        name: &str,
        confirmed: bool,
    ) -> Result<(), StorageError> {
        let dir = path.as_query();
        self.record(Call::DeleteDirectory(dir.clone(), name.to_string(), confirmed));
        if let Some(err) = lock(&self.directory_failures).get(name) {
            return Err(err.clone());
        }
        let mut tree = self.lock_tree();
        let full = join(&dir, name);
        let has_children = tree.get(&full).is_some_and(|c| !c.is_empty());
        if has_children && !confirmed {
            return Err(StorageError::ConfirmationRequired);
        }
        let prefix = format!("{full}/");
        tree.retain(|k, _| k != &full && !k.starts_with(&prefix));
        if let Some(siblings) = tree.get_mut(&dir) {
            siblings.retain(|e| !(e.is_dir && e.name == name));
        }
        Ok(())
    }

    async fn rename(
        &self,
        path: &RemotePath,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), StorageError> {
        let dir = path.as_query();
        self.record(Call::Rename(dir.clone(), old_name.to_string(), new_name.to_string()));
        let mut tree = self.lock_tree();
        let siblings = tree.entry(dir).or_default();
        if siblings.iter().any(|e| e.name == new_name) {
            return Err(StorageError::NameConflict(new_name.to_string()));
        }
        match siblings.iter_mut().find(|e| e.name == old_name) {
            Some(entry) => {
                entry.name = new_name.to_string();
                Ok(())
            }
            None => Err(StorageError::InvalidName(old_name.to_string())),
        }
    }

    async fn upload_file(&self, path: &RemotePath, file: &Path) -> Result<(), StorageError> {
        let dir = path.as_query();
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.record(Call::Upload(dir.clone(), name.clone()));
        if let Some(err) = lock(&self.upload_failure).clone() {
            return Err(err);
        }
        self.lock_tree()
            .entry(dir)
            .or_default()
            .push(Entry::file(&name, 0));
        Ok(())
    }
}
