use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use civi_core::PostType;
use civi_sync::{FieldSink, PostUpdate, SyncError};

/// Field sink for replays: every post type carries the fields named on the
/// command line, and updates are collected for printing instead of written.
pub struct PreviewSink {
    fields: Vec<String>,
    updates: Mutex<Vec<PostUpdate>>,
}

impl PreviewSink {
    pub const fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn take_updates(&self) -> Vec<PostUpdate> {
        std::mem::take(&mut *self.updates.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl FieldSink for PreviewSink {
    async fn fields_for_post(&self, _post_type: &PostType) -> Result<Vec<String>, SyncError> {
        Ok(self.fields.clone())
    }

    async fn apply(&self, update: &PostUpdate) -> Result<(), SyncError> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(update.clone());
        Ok(())
    }
}
