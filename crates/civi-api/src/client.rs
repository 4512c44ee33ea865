//! REST client for the CRM API endpoint.

use std::time::Duration;

use async_trait::async_trait;
use civi_config::CrmConfig;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::check_response;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::CrmApi;

/// HTTP client for the CRM REST endpoint.
///
/// Read actions (`get`, `getcount`, ...) go out as GET requests with the
/// parameters in the query string; everything else is POSTed as a form.
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    site_key: String,
}

impl CrmClient {
    /// Build a client from the `[crm]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` fails
    /// to build.
    pub fn from_config(config: &CrmConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            site_key: config.site_key.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query string for a read request, including credentials.
    fn read_url(&self, request: &ApiRequest) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}entity={}&action={}&json={}&api_key={}&key={}",
            self.endpoint,
            urlencoding::encode(&request.entity),
            urlencoding::encode(&request.action),
            urlencoding::encode(&request.params_json()),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.site_key),
        )
    }

    fn form_fields(&self, request: &ApiRequest) -> [(&'static str, String); 5] {
        [
            ("entity", request.entity.clone()),
            ("action", request.action.clone()),
            ("json", request.params_json()),
            ("api_key", self.api_key.clone()),
            ("key", self.site_key.clone()),
        ]
    }
}

#[async_trait]
impl CrmApi for CrmClient {
    async fn call(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        tracing::debug!(entity = %request.entity, action = %request.action, "crm call");

        let resp = if request.is_read() {
            self.http.get(self.read_url(request)).send().await?
        } else {
            self.http
                .post(&self.endpoint)
                .form(&self.form_fields(request))
                .send()
                .await?
        };
        let resp = check_response(resp).await?;

        let envelope: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("invalid JSON from CRM: {e}")))?;
        ApiResponse::from_envelope(envelope)
    }
}
