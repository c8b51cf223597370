use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use uuid::Uuid;

use crate::api::directory::SegmentLookup;
use crate::api::{DirectoryOps, FileOps};
use crate::realtime::{events, EventHandler, Listener, RealtimeError};
use crate::types::DirectoryContents;

/// Change-notification wiring. Every registration re-fetches current
/// state through the regular operation groups rather than diffing the
/// event payload, so consumers always observe a fresh read.
///
/// Multiple rapid server notifications may collapse into fewer observed
/// callbacks; the only guarantee is at least one refresh per change
/// batch.
#[derive(Debug, Clone)]
pub struct ListenerOps {
    listener: Arc<Listener>,
    directory: DirectoryOps,
    file: FileOps,
}

impl ListenerOps {
    pub(crate) fn new(listener: Arc<Listener>, directory: DirectoryOps, file: FileOps) -> Self {
        Self {
            listener,
            directory,
            file,
        }
    }

    /// Open the realtime channel. Must be called before any `on_*`
    /// registration that announces interest to the server.
    pub async fn connect(&self) -> Result<(), RealtimeError> {
        self.listener.connect().await
    }

    pub fn disconnect(&self) {
        self.listener.disconnect();
    }

    /// Raw hook: run `callback` on every directory mutation signal.
    pub fn on_directory_change<F>(&self, callback: F)
    where
        F: Fn(Option<Value>) + Send + Sync + 'static,
    {
        let handler: EventHandler = Arc::new(move |data| {
            callback(data);
            futures::future::ready(()).boxed()
        });
        self.listener.on(events::DIRECTORY_CHANGE, handler);
    }

    /// Remove every directory-change handler. Re-subscribing requires a
    /// fresh registration.
    pub fn disconnect_read_directory_event(&self) {
        self.listener.off(events::DIRECTORY_CHANGE);
    }

    /// Announce interest in a directory, then forward its re-fetched
    /// contents on every subsequent change signal.
    pub fn on_read_directory_event<F>(&self, id: Uuid, on_change: F) -> Result<(), RealtimeError>
    where
        F: Fn(DirectoryContents) + Send + Sync + 'static,
    {
        self.listener.emit(events::DIRECTORY_INITIALIZE)?;
        let directory = self.directory.clone();
        let on_change = Arc::new(on_change);
        let handler: EventHandler = Arc::new(move |_| {
            let directory = directory.clone();
            let on_change = on_change.clone();
            async move {
                match directory.contents(Some(id)).await {
                    Ok(contents) => on_change(contents),
                    Err(err) => tracing::warn!(%id, "directory refresh failed: {err}"),
                }
            }
            .boxed()
        });
        self.listener.on(events::DIRECTORY_CHANGE, handler);
        Ok(())
    }

    /// Same pattern for path-based lookups.
    pub fn on_read_directory_segment_change<F>(&self, segments: String, on_change: F)
    where
        F: Fn(SegmentLookup) + Send + Sync + 'static,
    {
        let directory = self.directory.clone();
        let on_change = Arc::new(on_change);
        let handler: EventHandler = Arc::new(move |_| {
            let directory = directory.clone();
            let on_change = on_change.clone();
            let segments = segments.clone();
            async move {
                match directory.get_by_segment(&segments).await {
                    Ok(lookup) => on_change(lookup),
                    Err(err) => tracing::warn!(%segments, "segment refresh failed: {err}"),
                }
            }
            .boxed()
        });
        self.listener.on(events::DIRECTORY_CHANGE, handler);
    }

    /// Announce interest in the aggregate size, then forward the
    /// re-fetched total on every change signal.
    pub fn on_total_size_change<F>(&self, on_change: F) -> Result<(), RealtimeError>
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        self.listener.emit(events::TOTAL_SIZE_INITIALIZE)?;
        let file = self.file.clone();
        let on_change = Arc::new(on_change);
        let handler: EventHandler = Arc::new(move |_| {
            let file = file.clone();
            let on_change = on_change.clone();
            async move {
                match file.total_size().await {
                    Ok(total) => on_change(total),
                    Err(err) => tracing::warn!("total size refresh failed: {err}"),
                }
            }
            .boxed()
        });
        self.listener.on(events::TOTAL_SIZE_CHANGE, handler);
        Ok(())
    }
}
