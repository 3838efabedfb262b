//! Rendering-independent explorer state.
//!
//! [`Explorer`] owns the current path, the listing, the selection and the
//! delete coordinator. User intents arrive as [`Command`]s and storage
//! completions as [`StorageEvent`]s; both return the [`Effect`]s the
//! runtime must perform next.

mod delete;
mod effect;
mod listing;
mod notice;
mod selection;
mod transfer;


use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::{debug, info, warn};

pub use delete::{DeleteOrigin, DeletePhase, PendingDelete};
pub use effect::{Effect, Request};
pub use listing::Listing;
pub use notice::{Notice, NoticeKind};
pub use selection::{SelectMode, Selection};
pub use transfer::download_url;

use crate::app_event::StorageEvent;
use crate::models::EntryKey;
use crate::storage::path::validate_segment;
use crate::storage::RemotePath;
use delete::{ConfirmOutcome, DeleteCoordinator, StepOutcome};
use listing::ListingCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    SetFilter(String),
    /// Click on an entry: toggles it in select mode, enters it when it is
    /// a directory otherwise.
    Activate(EntryKey),
    Ascend,
    ToggleSelectMode,
    CreateDirectory(String),
    Rename { target: EntryKey, new_name: String },
    RequestDelete(EntryKey),
    RequestBulkDelete,
    ConfirmDelete(String),
    CancelDelete,
    Download(EntryKey),
    DownloadSelected,
    CopyLink(EntryKey),
    Upload(PathBuf),
    DismissNotice,
}

#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    pub base_url: Url,
    pub confirmation_phrase: String,
    pub always_confirm_bulk_delete: bool,
    pub notice_ttl: Duration,
}

#[derive(Debug)]
pub struct Explorer {
    path: RemotePath,
    filter: String,
    cache: ListingCache,
    selection: Selection,
    deletes: DeleteCoordinator,
    notice: Option<Notice>,
    base_url: Url,
    notice_ttl: Duration,
}

impl Explorer {
    pub fn new(start: RemotePath, options: ExplorerOptions) -> Self {
        Self {
            path: start,
            filter: String::new(),
            cache: ListingCache::default(),
            selection: Selection::default(),
            deletes: DeleteCoordinator::new(
                &options.confirmation_phrase,
                options.always_confirm_bulk_delete,
            ),
            notice: None,
            base_url: options.base_url,
            notice_ttl: options.notice_ttl,
        }
    }

    /// Effects for the initial load.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.refresh()]
    }

    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn listing(&self) -> &Listing {
        self.cache.listing()
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn delete_phase(&self) -> &DeletePhase {
        self.deletes.phase()
    }

    pub fn pending_confirmation(&self) -> Option<&PendingDelete> {
        self.deletes.awaiting_confirmation()
    }

    pub fn confirmation_phrase(&self) -> &str {
        self.deletes.phrase()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Shows a notice. A blocking notice stays up until `DismissNotice`;
    /// lesser notices raised meanwhile are only logged.
    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        let text = text.into();
        if kind != NoticeKind::Blocking && self.is_blocked() {
            debug!("Blocking notice shown; dropping {:?} notice {:?}", kind, text);
            return;
        }
        self.notice = Some(Notice::new(kind, text));
    }

    fn is_blocked(&self) -> bool {
        self.notice
            .as_ref()
            .is_some_and(|n| n.kind == NoticeKind::Blocking)
    }

    /// Drops an expired notice.
    pub fn tick(&mut self) {
        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.is_expired(self.notice_ttl))
        {
            self.notice = None;
        }
    }

    pub fn download_url(&self, key: &EntryKey) -> Url {
        download_url(&self.base_url, &self.path, key)
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Effect> {
        debug!("Command: {:?}", command);
        match command {
            Command::Refresh => vec![self.refresh()],
            Command::SetFilter(filter) => {
                self.filter = filter;
                vec![self.refresh()]
            }
            Command::Activate(key) => self.activate(key),
            Command::Ascend => {
                if self.path.is_root() {
                    return Vec::new();
                }
                let parent = self.path.ascend();
                self.enter(parent)
            }
            Command::ToggleSelectMode => {
                let mode = self.selection.toggle_mode();
                debug!("Select mode now {:?}", mode);
                Vec::new()
            }
            Command::CreateDirectory(name) => self.create_directory(&name),
            Command::Rename { target, new_name } => self.rename(target, &new_name),
            Command::RequestDelete(key) => {
                if !self.is_listed(&key) {
                    return Vec::new();
                }
                self.request_delete(vec![key], DeleteOrigin::ContextMenu)
            }
            Command::RequestBulkDelete => {
                let targets: Vec<EntryKey> = self
                    .listing()
                    .entries
                    .iter()
                    .map(|e| e.key())
                    .filter(|k| self.selection.contains(k))
                    .collect();
                if targets.is_empty() {
                    self.notify(NoticeKind::Info, "Nothing selected");
                    return Vec::new();
                }
                self.request_delete(targets, DeleteOrigin::Bulk)
            }
            Command::ConfirmDelete(input) => match self.deletes.confirm(&input) {
                ConfirmOutcome::Accepted(effect) => vec![effect],
                ConfirmOutcome::Mismatch => {
                    let phrase = self.deletes.phrase().to_string();
                    self.notify(
                        NoticeKind::Info,
                        format!("Delete cancelled: type {phrase} to confirm"),
                    );
                    Vec::new()
                }
                ConfirmOutcome::NothingPending => Vec::new(),
            },
            Command::CancelDelete => {
                self.deletes.cancel();
                Vec::new()
            }
            Command::Download(key) => {
                if !self.is_listed(&key) {
                    return Vec::new();
                }
                vec![self.open_effect(&key)]
            }
            Command::DownloadSelected => {
                if self.selection.is_empty() {
                    self.notify(NoticeKind::Info, "Nothing selected to download");
                    return Vec::new();
                }
                self.selection
                    .iter()
                    .map(|key| self.open_effect(key))
                    .collect()
            }
            Command::CopyLink(key) => {
                if !self.is_listed(&key) {
                    return Vec::new();
                }
                self.notify(NoticeKind::Success, format!("Copied link to {}", key.name));
                vec![Effect::CopyLink {
                    url: self.download_url(&key).to_string(),
                    name: key.name,
                }]
            }
            Command::Upload(file) => self.upload(file),
            Command::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, event: StorageEvent) -> Vec<Effect> {
        match event {
            StorageEvent::Listed { request_id, result } => {
                match result {
                    Ok(entries) => {
                        if self.cache.accept(request_id, entries) {
                            self.selection.retain_listed(self.cache.listing());
                        } else {
                            debug!("Discarding stale listing #{}", request_id);
                        }
                    }
                    Err(err) => {
                        if self.cache.reject(request_id) {
                            warn!("Listing {} failed: {}", self.path, err);
                            self.selection.retain_listed(self.cache.listing());
                        } else {
                            debug!("Stale listing #{} failed: {}", request_id, err);
                        }
                    }
                }
                Vec::new()
            }
            StorageEvent::Probed { path, result } => {
                self.deletes.probe_finished(&path, result).into_iter().collect()
            }
            StorageEvent::Deleted(result) => match self.deletes.step_finished(result) {
                StepOutcome::Continue(effect) => vec![effect],
                StepOutcome::Finished { deleted, failure } => {
                    match failure {
                        Some(err) => self.notify(
                            NoticeKind::Blocking,
                            format!("Delete stopped after {deleted} item(s): {err}"),
                        ),
                        None => self.notify(
                            NoticeKind::Success,
                            format!("Deleted {deleted} item(s)"),
                        ),
                    }
                    vec![self.refresh()]
                }
                StepOutcome::Ignored => Vec::new(),
            },
            StorageEvent::Created { name, result } => match result {
                Ok(()) => {
                    self.notify(NoticeKind::Success, format!("Created folder {name}"));
                    vec![self.refresh()]
                }
                Err(err) => {
                    self.notify(NoticeKind::Failure, format!("Cannot create {name}: {err}"));
                    Vec::new()
                }
            },
            StorageEvent::Renamed {
                old_name,
                new_name,
                result,
            } => match result {
                Ok(()) => {
                    self.notify(
                        NoticeKind::Success,
                        format!("Renamed {old_name} to {new_name}"),
                    );
                    vec![self.refresh()]
                }
                Err(err) => {
                    self.notify(NoticeKind::Failure, format!("Cannot rename {old_name}: {err}"));
                    Vec::new()
                }
            },
            StorageEvent::Uploaded { file_name, result } => match result {
                Ok(()) => {
                    info!("Uploaded {}", file_name);
                    self.notify(NoticeKind::Success, format!("File uploaded: {file_name}"));
                    vec![self.refresh()]
                }
                Err(err) => {
                    warn!("Upload of {} failed: {}", file_name, err);
                    self.notify(
                        NoticeKind::Failure,
                        format!("Upload of {file_name} failed: {err}"),
                    );
                    Vec::new()
                }
            },
        }
    }

    fn refresh(&mut self) -> Effect {
        let request_id = self.cache.issue(self.path.clone(), &self.filter);
        Request::List {
            request_id,
            path: self.path.clone(),
        }
        .into()
    }

    /// Entry clicks only count against the listing of the current path, so
    /// a click on a stale view never resolves against the wrong directory.
    fn is_listed(&self, key: &EntryKey) -> bool {
        let listing = self.listing();
        listing.path == self.path && listing.contains(key)
    }

    fn enter(&mut self, path: RemotePath) -> Vec<Effect> {
        info!("Entering {}", path);
        self.path = path;
        self.selection.clear();
        vec![self.refresh()]
    }

    fn activate(&mut self, key: EntryKey) -> Vec<Effect> {
        if !self.is_listed(&key) {
            return Vec::new();
        }
        if self.selection.is_selecting() {
            self.selection.toggle(key);
            return Vec::new();
        }
        if !key.is_dir {
            return Vec::new();
        }
        match self.path.descend(&key.name) {
            Ok(child) => self.enter(child),
            Err(err) => {
                self.notify(NoticeKind::Failure, err.to_string());
                Vec::new()
            }
        }
    }

    fn create_directory(&mut self, name: &str) -> Vec<Effect> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(NoticeKind::Failure, "Enter a folder name");
            return Vec::new();
        }
        if validate_segment(name).is_err() {
            self.notify(NoticeKind::Failure, format!("Invalid folder name: {name}"));
            return Vec::new();
        }
        vec![Request::CreateDirectory {
            path: self.path.clone(),
            name: name.to_string(),
        }
        .into()]
    }

    fn rename(&mut self, target: EntryKey, new_name: &str) -> Vec<Effect> {
        let new_name = new_name.trim();
        if !self.is_listed(&target) || new_name.is_empty() || new_name == target.name {
            return Vec::new();
        }
        if validate_segment(new_name).is_err() {
            self.notify(NoticeKind::Failure, format!("Invalid name: {new_name}"));
            return Vec::new();
        }
        vec![Request::Rename {
            path: self.path.clone(),
            old_name: target.name,
            new_name: new_name.to_string(),
        }
        .into()]
    }

    fn request_delete(&mut self, targets: Vec<EntryKey>, origin: DeleteOrigin) -> Vec<Effect> {
        if self.is_blocked() {
            debug!("Delete refused until the previous failure is dismissed");
            return Vec::new();
        }
        if !self.deletes.is_idle() {
            self.notify(NoticeKind::Info, "A delete is already in progress");
            return Vec::new();
        }
        self.deletes
            .request(self.path.clone(), targets, origin)
            .into_iter()
            .collect()
    }

    fn upload(&mut self, file: PathBuf) -> Vec<Effect> {
        let Some(name) = file.file_name().map(|n| n.to_string_lossy().to_string()) else {
            self.notify(NoticeKind::Failure, "Choose a file to upload");
            return Vec::new();
        };
        self.notify(NoticeKind::Info, format!("Uploading {name}..."));
        vec![Request::Upload {
            path: self.path.clone(),
            file,
        }
        .into()]
    }

    fn open_effect(&self, key: &EntryKey) -> Effect {
        Effect::Open {
            name: key.name.clone(),
            url: self.download_url(key).to_string(),
        }
    }
}
