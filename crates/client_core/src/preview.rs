use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
};

use shared::domain::PreviewId;

use crate::validator::SelectedFile;

/// Display-only reference to the selected image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHandle {
    pub id: PreviewId,
    pub uri: String,
}

/// Creates and releases preview handles. The session holds at most one
/// handle and releases it before asking for the next.
pub trait PreviewStore: Send + Sync {
    fn create(&self, file: &SelectedFile) -> PreviewHandle;
    fn release(&self, handle: PreviewHandle);
}

/// Keeps preview bytes in memory under `blob:` style URIs.
#[derive(Default)]
pub struct InMemoryPreviewStore {
    next_id: AtomicU64,
    live: Mutex<HashMap<PreviewId, Arc<[u8]>>>,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or_default()
    }

    pub fn bytes(&self, id: PreviewId) -> Option<Arc<[u8]>> {
        self.live.lock().ok()?.get(&id).cloned()
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn create(&self, file: &SelectedFile) -> PreviewHandle {
        let id = PreviewId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        if let Ok(mut live) = self.live.lock() {
            live.insert(id, Arc::from(file.bytes()));
        }
        PreviewHandle {
            id,
            uri: format!("blob:preview/{}", id.0),
        }
    }

    fn release(&self, handle: PreviewHandle) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(&handle.id);
        }
    }
}
