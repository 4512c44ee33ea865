//! Sync direction switches.

use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Mirror CRM record changes into post fields.
    #[serde(default = "default_true")]
    pub push_to_posts: bool,

    /// Mirror post saves back into CRM records.
    #[serde(default = "default_true")]
    pub push_to_crm: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            push_to_posts: true,
            push_to_crm: true,
        }
    }
}
