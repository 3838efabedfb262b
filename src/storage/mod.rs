//! Remote storage access.
//!
//! [`StorageApi`] is the seam between the explorer state machine and the
//! REST backend. [`HttpStorage`] talks to the real server; tests use an
//! in-memory fake.

use std::future::Future;
use std::path::Path;

use crate::error::StorageError;
use crate::models::Entry;

#[cfg(test)]
pub mod fake;
mod http;
pub mod path;

pub use http::HttpStorage;
pub use path::RemotePath;

/// Operations offered by the storage backend. Each one maps to a single
/// HTTP request.
pub trait StorageApi: Send + Sync {
    /// Lists the children of `path`, unfiltered and in server order.
    fn list(
        &self,
        path: &RemotePath,
    ) -> impl Future<Output = Result<Vec<Entry>, StorageError>> + Send;

    fn create_directory(
        &self,
        path: &RemotePath,
        name: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes several files of one directory in a single request.
    fn delete_files(
        &self,
        path: &RemotePath,
        names: &[String],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes a directory. The server refuses a non-empty directory with
    /// [`StorageError::ConfirmationRequired`] unless `confirmed` is set.
    fn delete_directory(
        &self,
        path: &RemotePath,
        name: &str,
        confirmed: bool,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn rename(
        &self,
        path: &RemotePath,
        old_name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Uploads one local file into `path`.
    fn upload_file(
        &self,
        path: &RemotePath,
        file: &Path,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
