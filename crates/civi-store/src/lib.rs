//! # civi-store
//!
//! Settings storage for civibridge.
//!
//! The admin settings screen persists one mapping table per entity kind in a
//! simple key/value store. [`SettingsDb`] is the libSQL-backed store,
//! [`MemorySettings`] the in-memory one, and [`MappingStore`] layers the
//! per-kind mapping tables on top of either.

pub mod error;
pub mod mapping_store;
mod migrations;
pub mod settings;

pub use error::StoreError;
pub use mapping_store::MappingStore;
pub use settings::{MemorySettings, SettingsStore};

use libsql::Builder;

/// libSQL database handle holding the `settings` table.
pub struct SettingsDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SettingsDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let settings_db = Self { db, conn };
        settings_db.run_migrations().await?;
        tracing::debug!(path, "settings database opened");
        Ok(settings_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = SettingsDb::open_local(":memory:").await.unwrap();
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                ["settings"],
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = SettingsDb::open_local(":memory:").await.unwrap();
        db.run_migrations().await.unwrap();
    }
}
