//! Request shape for `entity.action(params)` calls.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Actions that only read data and can be sent as idempotent GET requests.
const READ_ACTIONS: &[&str] = &["get", "getsingle", "getvalue", "getcount", "getoptions", "getfields"];

/// A single CRM API call: entity name, action, and JSON parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub entity: String,
    pub action: String,
    pub params: Map<String, Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(entity: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            action: action.into(),
            params: Map::new(),
        }
    }

    /// Set a parameter, replacing any previous value.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Merge every key of a JSON object into the parameters. Non-object
    /// values are ignored.
    #[must_use]
    pub fn params_from(mut self, values: &Value) -> Self {
        if let Some(object) = values.as_object() {
            for (key, value) in object {
                self.params.insert(key.clone(), value.clone());
            }
        }
        self
    }

    /// Set `options.limit`. `0` asks for every row.
    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.option("limit", json!(limit))
    }

    /// Set `options.sort` (e.g. `"weight ASC"`).
    #[must_use]
    pub fn sort(self, sort: &str) -> Self {
        self.option("sort", json!(sort))
    }

    /// Restrict the returned fields.
    #[must_use]
    pub fn return_fields(self, fields: &[&str]) -> Self {
        self.param("return", fields.join(","))
    }

    fn option(mut self, key: &str, value: Value) -> Self {
        let options = self
            .params
            .entry("options")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = options {
            map.insert(key.to_string(), value);
        }
        self
    }

    /// Whether the action only reads data.
    #[must_use]
    pub fn is_read(&self) -> bool {
        READ_ACTIONS.contains(&self.action.to_ascii_lowercase().as_str())
    }

    /// Parameters encoded as the JSON string the REST endpoint expects.
    #[must_use]
    pub fn params_json(&self) -> String {
        Value::Object(self.params.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn options_accumulate() {
        let req = ApiRequest::new("OptionValue", "get")
            .param("option_group_id", "activity_type")
            .limit(0)
            .sort("weight ASC");
        assert_eq!(
            Value::Object(req.params),
            json!({
                "option_group_id": "activity_type",
                "options": {"limit": 0, "sort": "weight ASC"}
            })
        );
    }

    #[test]
    fn read_actions_are_detected() {
        assert!(ApiRequest::new("Activity", "getcount").is_read());
        assert!(ApiRequest::new("Activity", "GetSingle").is_read());
        assert!(!ApiRequest::new("Activity", "create").is_read());
        assert!(!ApiRequest::new("Activity", "delete").is_read());
    }

    #[test]
    fn params_from_merges_objects_only() {
        let req = ApiRequest::new("Case", "create")
            .param("id", 4)
            .params_from(&json!({"subject": "Intake", "id": 5}))
            .params_from(&json!("ignored"));
        assert_eq!(req.params["id"], json!(5));
        assert_eq!(req.params["subject"], json!("Intake"));
    }
}
