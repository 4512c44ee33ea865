use async_trait::async_trait;
use civi_api::{ApiError, ApiRequest, ApiResponse, CrmApi};

/// Stand-in used when `[crm]` is not configured. Mapping-table commands work
/// without the CRM; anything that reaches it fails with a pointer to the
/// missing settings.
pub struct OfflineCrm;

#[async_trait]
impl CrmApi for OfflineCrm {
    async fn call(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        Err(ApiError::Crm {
            message: format!(
                "cannot call {}.{}: [crm] endpoint, api_key and site_key are not configured",
                request.entity, request.action
            ),
            code: None,
        })
    }
}
