use std::path::Path;

use anyhow::Context;
use civi_config::CiviConfig;

/// Load `.env` from the project root (falling back to the usual dotenv
/// lookup), then the layered configuration rooted there.
pub fn load_config(project_root: &Path) -> anyhow::Result<CiviConfig> {
    load_project_dotenv(project_root)?;
    CiviConfig::load_from(project_root).context("failed to load civibridge configuration")
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
