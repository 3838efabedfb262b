use std::path::PathBuf;

use crate::storage::RemotePath;

/// Work the explorer asks the runtime to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the storage backend; the result comes back as a
    /// [`StorageEvent`](crate::app_event::StorageEvent).
    Request(Request),
    /// Hand a download URL to the system browser.
    Open { name: String, url: String },
    /// Put a download URL on the clipboard.
    CopyLink { name: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List {
        request_id: u64,
        path: RemotePath,
    },
    /// Emptiness probe of a directory about to be deleted.
    Probe {
        path: RemotePath,
    },
    DeleteFiles {
        path: RemotePath,
        names: Vec<String>,
    },
    DeleteDirectory {
        path: RemotePath,
        name: String,
        confirmed: bool,
    },
    CreateDirectory {
        path: RemotePath,
        name: String,
    },
    Rename {
        path: RemotePath,
        old_name: String,
        new_name: String,
    },
    Upload {
        path: RemotePath,
        file: PathBuf,
    },
}

impl From<Request> for Effect {
    fn from(request: Request) -> Self {
        Effect::Request(request)
    }
}
