//! Background remote calls for the TUI
//!
//! Every call runs as its own tokio task and reports back through the
//! application event channel; screen state is only touched by the main loop.

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::api::{ApiError, DocumentsApi, RemoteResource};
use crate::models::{Document, NewDocument, Upload};
use crate::sync::{DeleteConfirmation, SyncEvent};
use crate::tui::events::AppEvent;

/// Maps a list-view completion to the event of the screen that asked for it
pub type SyncRoute<T> = fn(SyncEvent<T>) -> AppEvent;
/// Maps a form submission result to the event of the form that sent it
pub type SubmitRoute<T> = fn(Result<T, ApiError>) -> AppEvent;

/// Spawns remote calls and routes their results into the event channel
#[derive(Debug, Clone)]
pub struct TaskRunner {
    tx: UnboundedSender<AppEvent>,
}

impl TaskRunner {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn load<R: RemoteResource>(&self, remote: R, route: SyncRoute<R::Record>) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = remote.list().await;
            deliver(&tx, route(SyncEvent::Loaded(result)));
        });
    }

    pub fn update<R: RemoteResource>(&self, remote: R, id: u64, changes: R::Changes, route: SyncRoute<R::Record>) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = remote.update(id, changes).await;
            deliver(&tx, route(SyncEvent::Updated { id, result }));
        });
    }

    pub fn remove<R: RemoteResource>(&self, remote: R, confirmation: DeleteConfirmation, route: SyncRoute<R::Record>) {
        let tx = self.tx.clone();
        let id = confirmation.id();
        tokio::spawn(async move {
            let result = remote.remove(id).await;
            deliver(&tx, route(SyncEvent::Removed { id, result }));
        });
    }

    pub fn create<R: RemoteResource>(&self, remote: R, draft: R::Draft, route: SubmitRoute<R::Record>) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = remote.create(draft).await;
            deliver(&tx, route(result));
        });
    }

    /// Read `path` and upload it as a new document
    pub fn upload(
        &self,
        remote: DocumentsApi,
        name: String,
        description: String,
        path: PathBuf,
        route: SubmitRoute<Document>,
    ) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match Upload::from_path(&path).await {
                Ok(file) => {
                    debug!("Read {} bytes from {}", file.bytes.len(), path.display());
                    remote.create(NewDocument { name, description, file }).await
                }
                Err(e) => Err(ApiError::from(e)),
            };
            deliver(&tx, route(result));
        });
    }
}

fn deliver(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        debug!("Result dropped, the interface has already shut down");
    }
}
