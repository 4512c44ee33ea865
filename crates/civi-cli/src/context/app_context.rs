use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use civi_api::{CrmApi, CrmClient};
use civi_config::CiviConfig;
use civi_resolver::ResolverSet;
use civi_store::{MappingStore, SettingsDb};

use super::offline::OfflineCrm;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: CiviConfig,
    pub store: MappingStore,
    pub api: Arc<dyn CrmApi>,
    pub resolvers: ResolverSet,
}

impl AppContext {
    /// Open the settings database and load every mapping table.
    ///
    /// A missing `[crm]` section is not an error here; commands that need the
    /// CRM call [`Self::require_crm`].
    pub async fn init(project_root: &Path, config: CiviConfig) -> anyhow::Result<Self> {
        let db_path = settings_path(project_root, &config.store.path)?;
        let db = SettingsDb::open_local(&db_path)
            .await
            .with_context(|| format!("failed to open settings database at {db_path}"))?;
        let store = MappingStore::new(Arc::new(db));

        let api: Arc<dyn CrmApi> = if config.crm.is_configured() {
            let crm = config.crm.require().context("invalid [crm] configuration")?;
            Arc::new(CrmClient::from_config(crm).context("failed to build CRM client")?)
        } else {
            Arc::new(OfflineCrm)
        };

        let resolvers = ResolverSet::load(store.clone(), Arc::clone(&api))
            .await
            .context("failed to load mapping tables")?;

        Ok(Self {
            config,
            store,
            api,
            resolvers,
        })
    }

    /// Fail early, with the config hint, for commands that must reach the CRM.
    pub fn require_crm(&self) -> anyhow::Result<()> {
        self.config
            .crm
            .require()
            .map(|_| ())
            .context("this command needs the CRM; set [crm] in .civibridge/config.toml or CIVIBRIDGE_CRM__* env vars")
    }
}

/// Resolve the configured store path against the project root. `:memory:`
/// and absolute paths are used as-is; the parent directory is created.
fn settings_path(project_root: &Path, configured: &str) -> anyhow::Result<String> {
    if configured == ":memory:" {
        return Ok(configured.to_string());
    }
    let path = project_root.join(configured);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(path.to_string_lossy().into_owned())
}
