use std::sync::Arc;

use crate::intake::storage::{ResumeStorage, UploadPolicy};
use crate::intake::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Insert-only application records. Default: `PgRecordStore`.
    pub store: Arc<dyn RecordStore>,
    pub storage: ResumeStorage,
    pub policy: UploadPolicy,
}
