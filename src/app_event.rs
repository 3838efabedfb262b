use crate::error::StorageError;
use crate::models::Entry;
use crate::storage::RemotePath;

/// Completion of a storage request, posted back to the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageEvent {
    Listed {
        request_id: u64,
        result: Result<Vec<Entry>, StorageError>,
    },
    Probed {
        path: RemotePath,
        /// Number of children found.
        result: Result<usize, StorageError>,
    },
    Deleted(Result<(), StorageError>),
    Created {
        name: String,
        result: Result<(), StorageError>,
    },
    Renamed {
        old_name: String,
        new_name: String,
        result: Result<(), StorageError>,
    },
    Uploaded {
        file_name: String,
        result: Result<(), StorageError>,
    },
}
