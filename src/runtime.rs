//! Executes explorer effects.
//!
//! Storage requests run on tokio tasks and report back through an mpsc
//! channel; the explorer state itself is only touched by the UI loop.

use std::sync::Arc;

use arboard::Clipboard;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::app_event::StorageEvent;
use crate::explorer::{Effect, Request};
use crate::storage::StorageApi;

/// Runs one storage request to completion.
pub async fn perform<S: StorageApi>(storage: &S, request: Request) -> StorageEvent {
    match request {
        Request::List { request_id, path } => StorageEvent::Listed {
            request_id,
            result: storage.list(&path).await,
        },
        Request::Probe { path } => {
            let result = storage.list(&path).await.map(|children| children.len());
            StorageEvent::Probed { path, result }
        }
        Request::DeleteFiles { path, names } => {
            StorageEvent::Deleted(storage.delete_files(&path, &names).await)
        }
        Request::DeleteDirectory {
            path,
            name,
            confirmed,
        } => StorageEvent::Deleted(storage.delete_directory(&path, &name, confirmed).await),
        Request::CreateDirectory { path, name } => {
            let result = storage.create_directory(&path, &name).await;
            StorageEvent::Created { name, result }
        }
        Request::Rename {
            path,
            old_name,
            new_name,
        } => {
            let result = storage.rename(&path, &old_name, &new_name).await;
            StorageEvent::Renamed {
                old_name,
                new_name,
                result,
            }
        }
        Request::Upload { path, file } => {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.display().to_string());
            let result = storage.upload_file(&path, &file).await;
            StorageEvent::Uploaded { file_name, result }
        }
    }
}

/// Dispatches effects: storage requests are spawned, browser and clipboard
/// actions run in place. Returns the error text of a failed local action.
pub fn dispatch<S>(
    storage: &Arc<S>,
    tx: &mpsc::Sender<StorageEvent>,
    effects: Vec<Effect>,
) -> Option<String>
where
    S: StorageApi + 'static,
{
    let mut failure = None;
    for effect in effects {
        match effect {
            Effect::Request(request) => {
                debug!("Spawning {:?}", request);
                let storage = Arc::clone(storage);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let event = perform(storage.as_ref(), request).await;
                    if tx.send(event).await.is_err() {
                        debug!("UI loop gone; dropping storage event");
                    }
                });
            }
            Effect::Open { name, url } => {
                info!("Opening download of {} at {}", name, url);
                if let Err(e) = open::that(&url) {
                    error!("Failed to open {}: {}", url, e);
                    failure = Some(format!("Cannot open download for {name}: {e}"));
                }
            }
            Effect::CopyLink { name, url } => {
                let copied = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url));
                match copied {
                    Ok(()) => info!("Copied link of {}", name),
                    Err(e) => {
                        error!("Clipboard error: {}", e);
                        failure = Some(format!("Cannot copy link: {e}"));
                    }
                }
            }
        }
    }
    failure
}
