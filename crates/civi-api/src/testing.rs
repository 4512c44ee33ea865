//! Scripted in-process CRM for tests in this and downstream crates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::response::ApiResponse;
use crate::CrmApi;

type Responder = Arc<dyn Fn(&ApiRequest) -> Result<Value, ApiError> + Send + Sync>;

/// A [`CrmApi`] that answers from scripted envelopes and records every call.
///
/// Unscripted `(entity, action)` pairs fail with [`ApiError::Crm`].
#[derive(Default)]
pub struct ScriptedCrm {
    responders: Mutex<HashMap<(String, String), Responder>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedCrm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `entity.action` with the given raw envelope.
    #[must_use]
    pub fn on(self, entity: &str, action: &str, envelope: Value) -> Self {
        self.on_with(entity, action, move |_| Ok(envelope.clone()))
    }

    /// Always fail `entity.action` with a CRM-flagged error.
    #[must_use]
    pub fn fail(self, entity: &str, action: &str, message: &str) -> Self {
        let message = message.to_string();
        self.on_with(entity, action, move |_| {
            Err(ApiError::Crm {
                message: message.clone(),
                code: None,
            })
        })
    }

    /// Answer `entity.action` by inspecting the request.
    #[must_use]
    pub fn on_with<F>(self, entity: &str, action: &str, responder: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<Value, ApiError> + Send + Sync + 'static,
    {
        self.responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((entity.to_string(), action.to_string()), Arc::new(responder));
        self
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `entity.action` was called.
    pub fn call_count(&self, entity: &str, action: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.entity == entity && r.action == action)
            .count()
    }
}

#[async_trait]
impl CrmApi for ScriptedCrm {
    async fn call(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let responder = self
            .responders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(request.entity.clone(), request.action.clone()))
            .cloned();

        match responder {
            Some(respond) => ApiResponse::from_envelope(respond(request)?),
            None => Err(ApiError::Crm {
                message: format!("no scripted response for {}.{}", request.entity, request.action),
                code: None,
            }),
        }
    }
}
