use crate::catalog::{parse_catalog, CatalogError, Product};
use crate::event::AppEvent;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tokio::runtime::Handle;

/// Reads the catalog source off the UI thread and reports the outcome over
/// the app event channel. Fetches are triggered serially (startup, Retry);
/// at most one is in flight at a time.
pub struct CatalogFetcher {
    source: PathBuf,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl CatalogFetcher {
    pub fn new(source: PathBuf, tx: mpsc::Sender<AppEvent>, runtime_handle: Handle) -> Self {
        Self {
            source,
            tx,
            runtime_handle,
        }
    }

    pub fn fetch(&self) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        self.runtime_handle.spawn(async move {
            let event = match load_products(&source).await {
                Ok(products) => AppEvent::CatalogLoaded(products),
                Err(err) => AppEvent::CatalogFailed(err.to_string()),
            };
            let _ = tx.send(event);
        });
    }
}

async fn load_products(source: &Path) -> Result<Vec<Product>, CatalogError> {
    let bytes = tokio::fs::read(source)
        .await
        .map_err(|err| CatalogError::Unavailable {
            source: source.display().to_string(),
            message: err.to_string(),
        })?;
    parse_catalog(&source.display().to_string(), &bytes)
}
