use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use civi_api::{ApiError, ApiRequest, ApiResponse, CrmApi};

/// Forwards reads to the real CRM and records writes without sending them.
pub struct DryRunCrm {
    inner: Arc<dyn CrmApi>,
    writes: Mutex<Vec<ApiRequest>>,
}

impl DryRunCrm {
    pub fn new(inner: Arc<dyn CrmApi>) -> Self {
        Self {
            inner,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn take_writes(&self) -> Vec<ApiRequest> {
        std::mem::take(&mut *self.writes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl CrmApi for DryRunCrm {
    async fn call(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.is_read() {
            return self.inner.call(request).await;
        }
        tracing::debug!(entity = %request.entity, action = %request.action, "dry run: write recorded");
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        Ok(ApiResponse::default())
    }
}
