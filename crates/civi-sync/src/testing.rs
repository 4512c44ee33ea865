//! Recording field sink for tests in this and downstream crates.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use civi_core::PostType;

use crate::error::SyncError;
use crate::field_sink::{FieldSink, PostUpdate};

/// A [`FieldSink`] with fixed field lists that keeps every applied update.
#[derive(Default)]
pub struct RecordingSink {
    fields: HashMap<String, Vec<String>>,
    applied: Mutex<Vec<PostUpdate>>,
    reject: bool,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the fields posts of `post_type` carry.
    #[must_use]
    pub fn with_fields(mut self, post_type: &str, fields: &[&str]) -> Self {
        self.fields.insert(
            post_type.to_string(),
            fields.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Fail every `apply`.
    #[must_use]
    pub const fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    pub fn applied(&self) -> Vec<PostUpdate> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl FieldSink for RecordingSink {
    async fn fields_for_post(&self, post_type: &PostType) -> Result<Vec<String>, SyncError> {
        Ok(self.fields.get(post_type.as_str()).cloned().unwrap_or_default())
    }

    async fn apply(&self, update: &PostUpdate) -> Result<(), SyncError> {
        if self.reject {
            return Err(SyncError::Sink(format!("{} is read-only", update.post_type)));
        }
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(update.clone());
        Ok(())
    }
}
